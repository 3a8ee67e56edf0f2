use clap::Parser;
use jwt_workbench::prelude::*;

#[derive(Debug, Parser)]
pub struct ListAlgorithms {
    /// only list the algorithms of one family: hmac, rsa or ecdsa
    #[arg(short = 'k', long)]
    kind: Option<String>,
}

impl ListAlgorithms {
    pub fn execute(self) -> anyhow::Result<()> {
        let kind = self.kind.as_deref().map(str::to_ascii_lowercase);
        for alg in SignatureAlgorithm::ALL {
            let family = match alg.kind() {
                SignatureAlgorithmKind::Hmac => "hmac",
                SignatureAlgorithmKind::Rsa => "rsa",
                SignatureAlgorithmKind::Ecdsa => "ecdsa",
            };
            if kind.as_deref().is_some_and(|k| k != family) {
                continue;
            }
            let material = if alg.kind().requires_key_pair() { "key pair" } else { "secret" };
            println!("{alg}\t{family}\t{}\t{material}", alg.hash());
        }
        Ok(())
    }
}
