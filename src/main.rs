use anyhow::Result;
use clap::Parser;
use online_wallet::cli::Cli;
use online_wallet::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);
    cli.run().await
}
