use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use ukhsa_host::{app, init_tracing, HostConfig};

#[derive(Parser, Debug)]
#[command(name = "ukhsa-tracker")]
#[command(about = "Tracks UKHSA respiratory virus metrics for England")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh once, print sensor states as JSON and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = HostConfig::load(args.config.as_deref())?;

    init_tracing(&config.log.filter);

    if args.once {
        let states = app::run_once(&config).await?;
        println!("{}", serde_json::to_string_pretty(&states)?);
        return Ok(());
    }

    app::run(config).await
}
