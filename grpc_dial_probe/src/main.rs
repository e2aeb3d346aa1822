use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

mod args;
mod probe;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "grpc_dial_probe=info,grpc_dial_client=info,grpc_dial_common=info".into()
        }))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let report = probe::run(&args).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if !report.is_serving() {
        bail!("{} is not serving", report.target.address);
    }
    Ok(())
}
