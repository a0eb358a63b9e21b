use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::BufReader;

use crate::config::{Config, DEFAULT_API_URL};
use crate::dashboard::{Action, Dashboard};
use crate::render::{render, RenderOptions};
use crate::repl;
use crate::source::DataSource;
use crate::view::Filter;

#[derive(Parser)]
#[command(name = "deliverylens")]
#[command(author, version, about = "Engineering delivery metrics dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the dashboard backend
    #[arg(short, long, global = true, env = "DELIVERYLENS_API_URL", default_value = DEFAULT_API_URL)]
    url: String,

    /// Request timeout in seconds (defaults to no timeout)
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// Only show issues with this status ("All" for every status)
    #[arg(short, long, default_value = "All")]
    status: String,

    /// Only show issues assigned to this person ("All" for everyone)
    #[arg(short, long, default_value = "All")]
    assignee: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard once
    Show {
        #[command(flatten)]
        filters: FilterArgs,

        /// Disable ANSI colours
        #[arg(long, default_value_t = false)]
        no_color: bool,
    },
    /// Write the filtered dashboard view as JSON
    Export {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Refresh and filter the dashboard from stdin commands
    Interactive {
        /// Disable ANSI colours
        #[arg(long, default_value_t = false)]
        no_color: bool,
    },
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::new(&self.url, self.timeout)?;
        info!("Using dashboard backend at {}", config.api_url);

        let mut dashboard = Dashboard::new(DataSource::new(&config)?);

        match &self.command {
            Commands::Show { filters, no_color } => {
                load_filtered(&mut dashboard, filters).await;
                let color = !no_color && self.output.is_none() && std::io::stdout().is_terminal();
                let text = render(dashboard.state(), RenderOptions { color });
                self.write_output(&text)
            }
            Commands::Export { filters } => {
                load_filtered(&mut dashboard, filters).await;
                let snapshot = dashboard
                    .state()
                    .snapshot()
                    .context("Dashboard has no data after loading")?;

                self.write_output(&snapshot.to_json(self.pretty)?)
            }
            Commands::Interactive { no_color } => {
                let options = RenderOptions {
                    color: !no_color && std::io::stdout().is_terminal(),
                };
                let input = BufReader::new(tokio::io::stdin());
                repl::run(&mut dashboard, input, &mut tokio::io::stdout(), options).await?;
                Ok(())
            }
        }
    }

    fn write_output(&self, text: &str) -> Result<()> {
        if let Some(output_path) = &self.output {
            std::fs::write(output_path, text)?;
            info!("Dashboard written to: {}", output_path.display());
        } else {
            println!("{text}");
        }

        Ok(())
    }
}

async fn load_filtered(dashboard: &mut Dashboard, filters: &FilterArgs) {
    dashboard.dispatch(Action::SelectStatus(Filter::parse(&filters.status)));
    dashboard.dispatch(Action::SelectAssignee(Filter::parse(&filters.assignee)));
    dashboard.refresh().await;
}
