use clap::{Parser, Subcommand};
use frc_geo::location::providers::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use frc_geo::{geocode_range, merge_fragments, DataLayout, NominatimGeocoder};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// FRC team geocoder
///
/// Resolves team locations from a yearly roster (FRC{year}.csv) in batches,
/// then merges the batch files into Location/{year}/{year}Location.csv.
///
/// Examples:
///   frc-geo geocode --year 2023 --start 0 --end 500
///   frc-geo geocode --year 2023 --start 3000 --end 3585
///   frc-geo merge --year 2023 --quantity 8
#[derive(Parser)]
#[command(name = "frc-geo", version, about, long_about = None)]
struct Cli {
    /// Directory holding FRC{year}.csv and the Location/ tree.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Nominatim-compatible search endpoint.
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// User-Agent sent to the geocoding service.
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Geocode roster rows [start, end) into Location/{year}/{start}-{end}.csv.
    Geocode {
        #[arg(long)]
        year: u16,

        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Clamped to the roster length. Defaults to the whole roster.
        #[arg(long, default_value_t = usize::MAX)]
        end: usize,
    },
    /// Merge Location/{year}/0.csv .. {quantity-1}.csv into one file.
    Merge {
        #[arg(long)]
        year: u16,

        #[arg(long)]
        quantity: usize,
    },
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // Progress is logged to stderr; the JSON summary goes to stdout.
    match run(Cli::parse()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let layout = DataLayout::new(cli.root);

    let json = match cli.command {
        Command::Geocode { year, start, end } => {
            let mut geocoder = NominatimGeocoder::with_options(
                &cli.endpoint,
                &cli.user_agent,
                Duration::from_secs(cli.timeout_secs),
            );
            let batch = geocode_range(&layout, &mut geocoder, year, start, end)?;
            serde_json::to_string_pretty(&batch)?
        }
        Command::Merge { year, quantity } => {
            let merged = merge_fragments(&layout, year, quantity)?;
            serde_json::to_string_pretty(&merged)?
        }
    };
    Ok(json)
}
