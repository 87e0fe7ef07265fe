use anyhow::Context;
use buoy_core::{Config, Dataset, ForecastRequest, NdbcClient, RealtimeObservations};
use chrono::{Duration, Utc};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Select, Text};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "buoy", version, about = "NDBC buoy observations and marine forecasts")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the default station and dataset.
    Configure,

    /// List currently active stations.
    Stations {
        /// Only show stations whose id or name contains this text.
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show the latest realtime observations for a station.
    Observations {
        /// Station id, e.g. "41013". Defaults to the configured station.
        station: Option<String>,

        /// "txt" (meteorological) or "spec" (wave summary).
        #[arg(long)]
        dataset: Option<Dataset>,

        /// Number of most recent records to show.
        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Show the NDFD wind and wave forecast for a point.
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Forecast window in days from now.
        #[arg(long, default_value_t = 2)]
        days: i64,

        /// Metric units (m/s, meters) instead of knots and feet.
        #[arg(long)]
        metric: bool,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Stations { search, limit, json } => {
                let client = NdbcClient::from_config(&config)?;
                let stations = client
                    .list_stations()
                    .await
                    .context("Failed to fetch the active station list")?;

                let selected: Vec<_> = stations
                    .iter()
                    .filter(|s| search.as_deref().is_none_or(|q| s.matches(q)))
                    .take(limit.unwrap_or(usize::MAX))
                    .collect();

                if json {
                    println!("{}", serde_json::to_string_pretty(&selected)?);
                } else {
                    println!("{}", output::stations_table(&selected));
                    println!("{} of {} active stations", selected.len(), stations.len());
                }
                Ok(())
            }
            Command::Observations { station, dataset, limit, json } => {
                let station = match station {
                    Some(s) => s,
                    None => config.default_station()?.to_string(),
                };
                let dataset = match dataset {
                    Some(d) => d,
                    None => config.default_dataset()?,
                };

                let client = NdbcClient::from_config(&config)?;
                let Some(result) = client.get(&station, dataset).await else {
                    println!(
                        "No {} data available for station {station}.",
                        dataset.description()
                    );
                    return Ok(());
                };

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    return Ok(());
                }

                println!(
                    "Station {}: {} ({} records)",
                    station.to_uppercase(),
                    dataset.description(),
                    result.len()
                );
                let table = match &result {
                    RealtimeObservations::Meteorological(obs) => {
                        output::observations_table(obs, limit)
                    }
                    RealtimeObservations::WaveSummary(obs) => {
                        output::observations_table(obs, limit)
                    }
                };
                println!("{table}");
                Ok(())
            }
            Command::Forecast { lat, lon, days, metric, json } => {
                let now = Utc::now();
                let request = ForecastRequest::new(lat, lon, now)
                    .until(now + Duration::days(days))
                    .metric(metric);

                let client = NdbcClient::from_config(&config)?;
                let predictions = client
                    .forecast(&request)
                    .await
                    .with_context(|| format!("Failed to fetch forecast for {lat}, {lon}"))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&predictions)?);
                } else if predictions.is_empty() {
                    println!("No forecast data returned for {lat}, {lon}.");
                } else {
                    println!("{}", output::predictions_table(&predictions));
                }
                Ok(())
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current_station = config.default_station.clone().unwrap_or_default();
    let station = Text::new("Default station id:")
        .with_default(&current_station)
        .with_help_message("Find ids with `buoy stations --search <name>`")
        .prompt()?;

    let current_dataset = config.default_dataset()?;
    let cursor = Dataset::all().iter().position(|d| *d == current_dataset).unwrap_or(0);
    let dataset = Select::new("Default dataset:", Dataset::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    if station.trim().is_empty() {
        config.default_station = None;
    } else {
        config.set_default_station(&station);
    }
    config.set_default_dataset(dataset);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
