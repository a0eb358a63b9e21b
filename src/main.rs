mod cli;
mod config;
mod dashboard;
mod error;
mod models;
mod render;
mod repl;
mod source;
mod view;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting deliverylens - engineering delivery dashboard");
    cli.execute().await?;

    Ok(())
}
