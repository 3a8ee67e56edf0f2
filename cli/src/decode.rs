use clap::Parser;
use console::style;
use jwt_workbench::{claims::claim_spans, prelude::*};

use crate::utils::*;

#[derive(Debug, Parser)]
pub struct DecodeJwt {
    /// compact JWT, read from standard in when absent
    jwt: Option<String>,
    #[command(flatten)]
    keys: KeyArgs,
}

impl DecodeJwt {
    pub fn execute(self) -> anyhow::Result<()> {
        let jwt = match self.jwt {
            Some(jwt) => jwt,
            None => read_stdin()?,
        };
        let mut converter = self.keys.converter()?;
        converter.set_encoded(jwt.trim());
        converter.convert(ChangeOrigin::Encoded);

        let token = converter.token();
        println!("{}\n{}", style("Header").bold(), token.header);
        println!("{}\n{}", style("Payload").bold(), token.payload);
        for span in claim_spans(&token.payload) {
            println!("  {}", style(span.claim).dim());
        }

        if report_errors(&converter) {
            anyhow::bail!("JWT is not valid");
        }
        println!(
            "{}",
            style(format!("Signature verified with {}", converter.config().algorithm)).green()
        );
        Ok(())
    }
}
