//! WeatherLink Scraper CLI - Fetch and parse station summary pages.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use weatherlink_scraper::{
    config::Config,
    fetch::WeatherLinkClient,
    parser,
    record::WeatherRecord,
    sink::{JsonSink, RecordSink},
};

/// WeatherLink Scraper - Fetch and parse station summary pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Pretty-print the record JSON
    #[arg(short, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a station's summary page and print the parsed record
    Fetch {
        /// WeatherLink station identifier (the user name in the page URL)
        station: String,
    },
    /// Parse a saved summary page from disk
    Parse {
        /// Path to a summary page HTML file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = Config::load()?;
    config.validate()?;

    let record = match &args.command {
        Command::Fetch { station } => {
            let client = WeatherLinkClient::new(config.fetch_config())?;
            client.fetch_record(station).await?
        }
        Command::Parse { file } => {
            let html = fs::read(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            parser::parse_bytes(&html)?
        }
    };

    publish(&record, args.pretty || config.pretty)?;

    Ok(())
}

/// Write the record to stdout through the JSON sink.
fn publish(record: &WeatherRecord, pretty: bool) -> Result<()> {
    let stdout = io::stdout().lock();
    if pretty {
        JsonSink::pretty(stdout).publish(record)
    } else {
        JsonSink::new(stdout).publish(record)
    }
}
