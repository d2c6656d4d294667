#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the seizure dashboard.
//!
//! Prints the same summaries the API serves, or starts the server. Running
//! without a subcommand opens an interactive menu.

mod interactive;
mod report;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use seizure_map_analytics_models::RegionSelection;
use seizure_map_server_models::ApiDashboard;
use seizure_map_source::config::DashboardConfig;

#[derive(Parser)]
#[command(name = "seizure_map_cli", about = "Blade-weapon seizure dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print weapon totals per region and per unit
    Summary {
        /// First day included (YYYY-MM-DD). Defaults to the earliest record.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD). Defaults to the latest record.
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Region label, or "all"
        #[arg(long, default_value = "all")]
        region: RegionSelection,
        /// Print the dashboard payload as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// List the regions present in the data
    Regions,
    /// Start the API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    match command {
        Commands::Summary {
            from,
            to,
            region,
            json,
        } => {
            let config = DashboardConfig::from_env()?;
            let loaded = seizure_map_server::load_dataset(&config).await?;
            let filter = loaded.dataset.resolve_filter(from, to, region);
            let summary = loaded.dataset.summarize(filter.as_ref());

            if json {
                let dashboard = ApiDashboard::new(filter, summary, loaded.loaded_at);
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print!("{}", report::render(filter.as_ref(), &summary));
            }
        }
        Commands::Regions => regions().await?,
        Commands::Serve => serve().await?,
    }

    Ok(())
}

/// Prints the observed date span and the region selector options.
async fn regions() -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env()?;
    let loaded = seizure_map_server::load_dataset(&config).await?;
    print!("{}", report::render_regions(&loaded.dataset.filter_options()));
    Ok(())
}

/// Runs the server on actix's own runtime.
async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(|| {
        actix_web::rt::System::new().block_on(seizure_map_server::run_server())
    })
    .await??;
    Ok(())
}
