//! Parsing of the summary page's "as of" timestamp line.
//!
//! The page reports its observation time as a fixed phrase, e.g.
//! `"Current Conditions as of 12:01 Wednesday, September 9, 2015"`,
//! using a 24-hour clock.

use chrono::NaiveDateTime;

use crate::parser::ParseError;

const OBSERVED_AT_PREFIX: &str = "Current Conditions as of ";

const OBSERVED_AT_FORMAT: &str = "%H:%M %A, %B %d, %Y";

/// Parse the "as of" line into a naive timestamp.
///
/// Any deviation from the fixed phrase pattern is an error; the table walk
/// absorbs it and leaves `observed_at` null rather than aborting the parse.
pub fn parse_observed_at(text: &str) -> Result<NaiveDateTime, ParseError> {
    let remainder = text
        .strip_prefix(OBSERVED_AT_PREFIX)
        .ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))?;

    NaiveDateTime::parse_from_str(remainder, OBSERVED_AT_FORMAT)
        .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))
}
