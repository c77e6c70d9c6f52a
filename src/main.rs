use anyhow::Result;
use clap::Parser;

use tradebook::cli::{Cli, Commands};
use tradebook::commands;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { trades, month } => {
            commands::stats::summary(&trades, month.as_deref())?;
        }
        Commands::Equity { trades, mode, days } => {
            commands::stats::equity(&trades, mode.into(), days)?;
        }
        Commands::Volume { trades, days } => {
            commands::stats::volume(&trades, days)?;
        }
        Commands::Behavior { trades, days, daily_limit } => {
            commands::behavior::report(&trades, days, daily_limit)?;
        }
        Commands::Scan { image, tesseract, lang, json, check } => {
            commands::scan::run(image.as_deref(), &tesseract, &lang, json, check).await?;
        }
        Commands::News => {
            commands::news::run().await?;
        }
    }
    Ok(())
}
