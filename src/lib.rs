//! WeatherLink Scraper - A Rust library and CLI for turning Davis
//! WeatherLink station summary pages into structured weather records.
//!
//! This crate provides:
//! - A parser for the summary page's data table, driven by a small
//!   per-section state machine
//! - Normalization of mixed-unit readings to canonical metric units
//! - An async HTTP client for retrieving a station's page
//!
//! # Example
//!
//! ```rust,no_run
//! use weatherlink_scraper::parser;
//!
//! let html = std::fs::read_to_string("summary.html")?;
//! let record = parser::parse(&html)?;
//!
//! println!("{}", serde_json::to_string_pretty(&record)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod fetch;
pub mod parser;
pub mod record;
pub mod sink;
pub mod timestamp;
pub mod value;

pub use config::Config;
pub use fetch::{FetchConfig, FetchError, WEATHERLINK_BASE_URL, WeatherLinkClient};
pub use parser::{ParseError, parse, parse_bytes};
pub use record::{
    CellValue, MeasurementGroup, Meta, RainGroup, SummaryGroup, Unit, ValueCell, WeatherRecord,
    WindGroup,
};
pub use sink::{JsonSink, RecordSink};
pub use timestamp::parse_observed_at;
pub use value::{FieldHint, normalize, parse_wind_direction};
