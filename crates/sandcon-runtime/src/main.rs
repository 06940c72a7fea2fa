//! sandcon: replay sandbox console event scripts through the console
//! controller.

use clap::Parser;

use sandcon_runtime::{cli, replay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(cli::log_filter()))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        cli::Command::Replay(opts) => {
            let output = replay::cmd_replay(&opts).await?;
            print!("{output}");
        }
    }

    Ok(())
}
