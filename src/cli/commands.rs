use crate::application::pacing::Pacing;
use crate::application::refresh::CitySelection;
use crate::config::{DEFAULT_CITIES_PATH, DEFAULT_DATA_DIR};
use crate::domain::values::rolling_window::DEFAULT_RETENTION_DAYS;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "goldrates", about = "Daily gold prices per city, kept in a rolling window")]
pub struct Cli {
    /// Directory holding one JSON file per city
    #[arg(long, global = true, env = "GOLDRATES_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
    /// Cities list, one name per line
    #[arg(long, global = true, env = "GOLDRATES_CITIES", default_value = DEFAULT_CITIES_PATH)]
    pub cities: PathBuf,
    /// Days kept per city
    #[arg(long, global = true, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention: usize,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch today's price for every city
    Today {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Fetch yesterday (historical) and today for every city
    Update {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Fetch the last N days of history for every city
    Backfill {
        /// Days back to fetch, today included
        #[arg(long, default_value = "90")]
        days: u32,
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Fetch one city once and print the record (nothing is written)
    Fetch {
        city: String,
        /// Historical date (YYYY-MM-DD); current price when omitted
        #[arg(long)]
        date: Option<String>,
    },
    /// Trim every stored city file to the retention window
    Trim,
    /// Print the stored records for a city
    Show {
        city: String,
        /// Only the newest N records
        #[arg(long)]
        last: Option<usize>,
    },
}

impl Commands {
    /// Commands that call the upstream API and so need the API key.
    pub fn needs_api(&self) -> bool {
        matches!(
            self,
            Commands::Today { .. }
                | Commands::Update { .. }
                | Commands::Backfill { .. }
                | Commands::Fetch { .. }
        )
    }
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Only process the first N cities (0 = all)
    #[arg(long, default_value = "0")]
    pub sample: usize,
    /// Start from this city name (case-insensitive)
    #[arg(long)]
    pub start_from: Option<String>,
    /// Delay between requests in seconds
    #[arg(long, default_value = "0.15")]
    pub req_delay: f64,
    /// Pause between cities in seconds
    #[arg(long, default_value = "0")]
    pub city_pause: f64,
}

impl BatchArgs {
    pub fn selection(&self) -> CitySelection {
        CitySelection {
            start_from: self.start_from.clone(),
            sample: Some(self.sample),
        }
    }

    pub fn pacing(&self) -> Result<Pacing, String> {
        let secs = |name: &str, value: f64| {
            Duration::try_from_secs_f64(value)
                .map_err(|_| format!("--{name} must be a non-negative number of seconds"))
        };
        Ok(Pacing {
            request_delay: secs("req-delay", self.req_delay)?,
            city_pause: secs("city-pause", self.city_pause)?,
        })
    }
}
