mod hours;
mod search;

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use opennow_core::Amenity;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "opennow")]
#[command(about = "Find nearby pharmacies and hospitals that are open now")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search OpenStreetMap around a point and report open status
    Search {
        /// Latitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in metres (defaults to OPENNOW_SEARCH_DEFAULT_RADIUS_M)
        #[arg(long)]
        radius: Option<u32>,
        /// Kind of facility: pharmacy or hospital
        #[arg(long, default_value = "pharmacy")]
        amenity: Amenity,
        /// Only list places that are open right now
        #[arg(long)]
        open_only: bool,
        /// Print the outcome as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Parse an opening_hours string and evaluate it
    Hours {
        /// The opening_hours value, e.g. "Mo-Fr 09:00-18:00; Sa 10:00-14:00"
        spec: String,
        /// Instant to evaluate at, RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
        /// IANA zone to evaluate in (defaults to OPENNOW_DEFAULT_TIMEZONE)
        #[arg(long)]
        tz: Option<Tz>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = opennow_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            lat,
            lon,
            radius,
            amenity,
            open_only,
            json,
        } => {
            let args = search::SearchArgs {
                lat,
                lon,
                radius,
                amenity,
                open_only,
                json,
            };
            search::run_search(&config, &args).await?;
        }
        Commands::Hours { spec, at, tz } => {
            hours::run_hours(&config, &spec, at, tz);
        }
    }

    Ok(())
}
