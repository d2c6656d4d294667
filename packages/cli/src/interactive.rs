//! Menu shown when the CLI is run without a subcommand.

use chrono::NaiveDate;
use dialoguer::{Input, Select};
use seizure_map_analytics_models::{ALL_REGIONS, RegionSelection};
use seizure_map_source::config::DashboardConfig;

use crate::report;

enum Action {
    Summary,
    Regions,
    Serve,
}

impl Action {
    const ALL: &[Self] = &[Self::Summary, Self::Regions, Self::Serve];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Show weapon totals",
            Self::Regions => "List regions",
            Self::Serve => "Start server",
        }
    }
}

/// Prompts for an action and runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails, the data cannot be loaded, or the
/// server exits with an error.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Seizure Dashboard");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Summary => summary().await?,
        Action::Regions => crate::regions().await?,
        Action::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(seizure_map_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}

async fn summary() -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env()?;
    let loaded = seizure_map_server::load_dataset(&config).await?;
    let dataset = &loaded.dataset;

    let Some(bounds) = dataset.date_bounds() else {
        println!("No dated records; nothing to summarize.");
        return Ok(());
    };

    let from = prompt_date("From", bounds.start)?;
    let to = prompt_date("To", bounds.end)?;

    let mut regions = vec![ALL_REGIONS.to_string()];
    regions.extend(dataset.regions().iter().cloned());
    let idx = Select::new()
        .with_prompt("Region")
        .items(&regions)
        .default(0)
        .interact()?;
    let region: RegionSelection = regions[idx].clone().into();

    let filter = dataset.resolve_filter(Some(from), Some(to), region);
    let summary = dataset.summarize(filter.as_ref());
    print!("{}", report::render(filter.as_ref(), &summary));

    Ok(())
}

fn prompt_date(prompt: &str, default: NaiveDate) -> Result<NaiveDate, dialoguer::Error> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
}
