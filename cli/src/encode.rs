use std::path::PathBuf;

use clap::Parser;
use jwt_workbench::prelude::*;

use crate::utils::*;

#[derive(Debug, Parser)]
pub struct EncodeJwt {
    /// path to file with JSON claims, read from standard in when absent
    payload: Option<PathBuf>,
    /// path to file with the JSON header, 'alg' is overwritten with the configured algorithm
    #[arg(long)]
    header: Option<PathBuf>,
    #[command(flatten)]
    keys: KeyArgs,
}

impl EncodeJwt {
    pub fn execute(self) -> anyhow::Result<()> {
        let header = match &self.header {
            Some(path) => read_file(path)?,
            None => r#"{"typ":"JWT"}"#.to_string(),
        };
        let payload = read_file_or_stdin(self.payload.as_ref())?;

        let mut converter = self.keys.converter()?;
        converter.set_header(header);
        converter.set_payload(payload);
        converter.convert(ChangeOrigin::SignatureConfiguration);

        if report_errors(&converter) {
            anyhow::bail!("Could not sign the JWT");
        }
        println!("{}", converter.token().encoded);
        Ok(())
    }
}
