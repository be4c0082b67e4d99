//! Parser for WeatherLink station summary pages.
//!
//! The summary page carries all station data in one HTML table (the third
//! `<table>` in document order). Rows are grouped into layout sections by
//! header-label cells, and within a row the cells are positional: the first
//! data cell is the measurement name, every later one fills a slot
//! determined by its index and the current section. Those offsets are
//! positional rather than keyed, so a page without the expected table
//! structure is rejected outright; anything smaller than that — an odd
//! cell, an unknown unit, a garbled timestamp — degrades locally and never
//! aborts the parse.
//!
//! # Page Shape
//!
//! ```text
//! <table>                          (index 2)
//!   <tr><td class="summary_station_name">...   station label
//!   <tr><td class="summary_timestamp">...      "Current Conditions as of ..."
//!   <tr><td class="summary_header_label">...   section change
//!   <tr><td class="summary_data">label</td>
//!       <td class="summary_data">value</td>... positional slots
//! ```

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

use crate::record::{MeasurementGroup, RainGroup, SummaryGroup, WeatherRecord, WindGroup};
use crate::timestamp::parse_observed_at;
use crate::value::{FieldHint, normalize, parse_wind_direction};

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document does not contain the data table. Fatal: without the
    /// positional anchor there is nothing to salvage.
    #[error("summary page has {0} tables, expected the data table at index 2")]
    MissingDataTable(usize),

    /// The "as of" line does not match the fixed phrase pattern. Local to
    /// the timestamp field; the table walk absorbs it.
    #[error("invalid observation timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Index of the data table among all `<table>` elements on the page.
const DATA_TABLE_INDEX: usize = 2;

const STATION_NAME_CLASS: &str = "summary_station_name";
const TIMESTAMP_CLASS: &str = "summary_timestamp";
const SECTION_HEADER_CLASS: &str = "summary_header_label";
const DATA_CLASS: &str = "summary_data";

/// A cell spanning the full six-column row width is a visual separator.
const SEPARATOR_COLSPAN: &str = "6";

/// Empty data cells hold a lone non-breaking space.
const PLACEHOLDER: &str = "\u{a0}";

const WIND_DIRECTION_LABEL: &str = "Wind Direction";
const BAROMETER_LABEL: &str = "Barometer";

/// Layout section of the data table, driven by header-label cells. This is
/// the only state carried across rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the first header label.
    None,
    StationSummary,
    Wind,
    Rain,
    /// A header whose rows contribute no slots.
    Other,
}

impl Section {
    fn from_label(label: &str) -> Self {
        match label {
            "Station Summary" => Section::StationSummary,
            "Wind" => Section::Wind,
            "Rain" => Section::Rain,
            _ => Section::Other,
        }
    }

    /// The canonical empty group for a measurement row in this section, or
    /// `None` for sections whose rows are walked but never recorded.
    fn default_group(self) -> Option<MeasurementGroup> {
        match self {
            Section::StationSummary => Some(MeasurementGroup::Summary(SummaryGroup::default())),
            Section::Wind => Some(MeasurementGroup::Wind(WindGroup::default())),
            Section::Rain => Some(MeasurementGroup::Rain(RainGroup::default())),
            Section::None | Section::Other => None,
        }
    }
}

/// Parse a summary page into a [`WeatherRecord`].
///
/// # Example
///
/// ```
/// use weatherlink_scraper::parser::parse;
///
/// let html = r#"
///   <table></table><table></table>
///   <table>
///     <tr><td class="summary_header_label">Station Summary</td></tr>
///     <tr><td class="summary_data">Outside Temp</td>
///         <td class="summary_data">72.7 F</td></tr>
///   </table>"#;
/// let record = parse(html).unwrap();
/// let group = record.data["Outside Temp"].as_summary().unwrap();
/// assert_eq!(group.current.value.unwrap().as_f64(), 22.6);
/// ```
pub fn parse(html: &str) -> ParseResult<WeatherRecord> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").expect("static selector");
    let row_selector = Selector::parse("tr").expect("static selector");
    let cell_selector = Selector::parse("td").expect("static selector");

    let tables: Vec<_> = document.select(&table_selector).collect();
    let Some(data_table) = tables.get(DATA_TABLE_INDEX) else {
        return Err(ParseError::MissingDataTable(tables.len()));
    };

    let mut record = WeatherRecord::default();
    let mut section = Section::None;

    for row in data_table.select(&row_selector) {
        let mut label: Option<String> = None;
        let mut value_index = 0;

        for cell in row.select(&cell_selector) {
            let text = cell_text(cell);

            if has_class(cell, STATION_NAME_CLASS) {
                record.meta.station_name = Some(text);
                continue;
            }
            if has_class(cell, TIMESTAMP_CLASS) {
                match parse_observed_at(&text) {
                    Ok(observed_at) => record.meta.observed_at = Some(observed_at),
                    Err(e) => debug!("leaving observed_at unset: {}", e),
                }
                continue;
            }
            if cell.value().attr("colspan") == Some(SEPARATOR_COLSPAN) {
                continue;
            }
            if has_class(cell, SECTION_HEADER_CLASS) {
                section = Section::from_label(&text);
                continue;
            }
            if !has_class(cell, DATA_CLASS) {
                continue;
            }

            // First data cell in the row is the measurement name; seeing it
            // again re-seeds the group from the section default.
            let Some(measurement) = &label else {
                if let Some(group) = section.default_group() {
                    record.data.insert(text.clone(), group);
                }
                label = Some(text);
                continue;
            };

            // Placeholder cells neither fill nor advance a slot.
            if text == PLACEHOLDER {
                continue;
            }

            if let Some(group) = record.data.get_mut(measurement) {
                fill_slot(group, measurement, value_index, &text);
            }
            value_index += 1;
        }
    }

    Ok(record)
}

/// Parse a raw response body. Invalid UTF-8 is replaced rather than
/// rejected since the markers the parser keys on are all ASCII.
pub fn parse_bytes(html: &[u8]) -> ParseResult<WeatherRecord> {
    parse(&String::from_utf8_lossy(html))
}

/// Write one positional value cell into its section-mapped slot.
fn fill_slot(group: &mut MeasurementGroup, measurement: &str, index: usize, text: &str) {
    match group {
        MeasurementGroup::Summary(summary) => match index {
            0 => {
                if measurement == WIND_DIRECTION_LABEL {
                    if let Some(cell) = parse_wind_direction(text) {
                        summary.current = cell;
                    }
                } else {
                    summary.current = normalize(text, field_hint(measurement));
                }
            }
            1 => summary.today_high = normalize(text, field_hint(measurement)),
            2 => summary.today_high.timestamp = Some(text.to_string()),
            3 => summary.today_low = normalize(text, field_hint(measurement)),
            4 => summary.today_low.timestamp = Some(text.to_string()),
            _ => {}
        },
        MeasurementGroup::Wind(wind) => match index {
            0 => wind.two_min = normalize(text, None),
            1 => wind.ten_min = normalize(text, None),
            _ => {}
        },
        MeasurementGroup::Rain(rain) => match index {
            0 => rain.current = normalize(text, None),
            1 => rain.day = normalize(text, None),
            2 => rain.storm = normalize(text, None),
            3 => rain.month = normalize(text, None),
            4 => rain.year = normalize(text, None),
            _ => {}
        },
    }
}

fn field_hint(measurement: &str) -> Option<FieldHint> {
    (measurement == BAROMETER_LABEL).then_some(FieldHint::Barometer)
}

/// A cell's text with surrounding markup whitespace removed. The
/// non-breaking-space placeholder must survive, so this trims ASCII
/// whitespace only.
fn cell_text(cell: ElementRef) -> String {
    let text: String = cell.text().collect();
    text.trim_matches(|c: char| c.is_ascii_whitespace())
        .to_string()
}

fn has_class(cell: ElementRef, class: &str) -> bool {
    cell.value().classes().any(|c| c == class)
}
