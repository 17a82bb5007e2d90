use anyhow::Result;
use clap::Parser;
use scriba::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
