use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{algorithms::ListAlgorithms, decode::DecodeJwt, encode::EncodeJwt};

mod algorithms;
mod decode;
mod encode;
mod utils;

#[derive(Debug, Parser)]
#[command(name = "jwt-workbench", version, about = "Decode, verify and sign JWTs")]
struct WorkbenchCli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode a compact JWT and check its signature
    Decode {
        #[command(flatten)]
        delegate: DecodeJwt,
    },
    /// Sign a header and a payload into a compact JWT
    Encode {
        #[command(flatten)]
        delegate: EncodeJwt,
    },
    /// List the supported signature algorithms
    Algorithms {
        #[command(flatten)]
        delegate: ListAlgorithms,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = WorkbenchCli::parse();
    match cli.cmd {
        Commands::Decode { delegate } => delegate.execute()?,
        Commands::Encode { delegate } => delegate.execute()?,
        Commands::Algorithms { delegate } => delegate.execute()?,
    };
    Ok(())
}
