use anyhow::Result;
use atmos_scene::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    atmos_scene::run(cli).await
}
