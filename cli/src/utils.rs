use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use console::style;
use jwt_workbench::prelude::*;

/// Signature configuration flags shared by every subcommand that signs or verifies
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// path to a JSON signature configuration, the flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// signature algorithm, e.g. HS256 or ES384
    #[arg(short = 'a', long, value_parser = parse_algorithm)]
    alg: Option<SignatureAlgorithm>,
    /// HMAC secret
    #[arg(short = 's', long)]
    secret: Option<String>,
    /// how to read the secret: raw, base32 or base64
    #[arg(long, value_parser = parse_secret_encoding)]
    secret_encoding: Option<SecretEncoding>,
    /// public key in PEM or bare base64, or a path to a file holding it
    #[arg(long)]
    public_key: Option<String>,
    /// private key in PEM or bare base64, or a path to a file holding it
    #[arg(long)]
    private_key: Option<String>,
    /// fill missing key material with the bundled examples
    #[arg(long)]
    examples: bool,
}

impl KeyArgs {
    pub fn converter(&self) -> anyhow::Result<Converter> {
        let mut config = match &self.config {
            Some(path) => {
                let json = read_file(path)?;
                serde_json::from_str::<SignatureConfig>(&json)
                    .with_context(|| format!("Invalid signature configuration in {path:?}"))?
            }
            None => SignatureConfig::default(),
        };
        if let Some(alg) = self.alg {
            config.algorithm = alg;
        }
        if let Some(secret) = &self.secret {
            config.secret = secret.clone();
        }
        if let Some(secret_encoding) = self.secret_encoding {
            config.secret_encoding = secret_encoding;
        }
        if let Some(pk) = &self.public_key {
            config.public_key = read_file_or_text(pk)?.into();
        }
        if let Some(sk) = &self.private_key {
            config.private_key = read_file_or_text(sk)?.into();
        }
        tracing::debug!(?config, "signature configuration");
        Ok(Converter::new(config, ExampleData::bundled(), self.examples))
    }
}

fn parse_algorithm(alg: &str) -> Result<SignatureAlgorithm, String> {
    SignatureAlgorithm::try_from(alg).map_err(|e| e.to_string())
}

fn parse_secret_encoding(encoding: &str) -> Result<SecretEncoding, String> {
    match encoding.to_ascii_lowercase().as_str() {
        "raw" => Ok(SecretEncoding::Raw),
        "base32" => Ok(SecretEncoding::Base32),
        "base64" => Ok(SecretEncoding::Base64),
        _ => Err(format!("Unknown secret encoding '{encoding}', expected raw, base32 or base64")),
    }
}

pub fn read_stdin() -> anyhow::Result<String> {
    use std::io::BufRead as _;

    let stdin = std::io::stdin();
    let mut result = vec![];
    for line in stdin.lock().lines() {
        result.push(line.context("Could not read line from standard in")?);
    }
    Ok(result.join("\n"))
}

pub fn read_file(file: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Could not read {file:?}"))
}

pub fn read_file_or_stdin(file: Option<&PathBuf>) -> anyhow::Result<String> {
    file.map(|f| read_file(f)).unwrap_or_else(read_stdin)
}

/// Key flags accept the key itself as well as a path
fn read_file_or_text(value: &str) -> anyhow::Result<String> {
    let path = Path::new(value);
    if path.is_file() { read_file(path) } else { Ok(value.to_string()) }
}

/// Prints every held error to stderr, returns whether there was any
pub fn report_errors(converter: &Converter) -> bool {
    let engine = converter.engine();
    let holders = [
        ("encoded", converter.encoded_errors()),
        ("header", converter.header_errors()),
        ("payload", converter.payload_errors()),
        ("signature", converter.signature_errors()),
        ("secret", engine.secret_errors()),
        ("public key", engine.public_key_errors()),
        ("private key", engine.private_key_errors()),
    ];
    let mut failed = false;
    for (name, holder) in holders {
        if let Some(message) = holder.message() {
            eprintln!("{} {message}", style(format!("{name}:")).red().bold());
            failed = true;
        }
    }
    failed
}
