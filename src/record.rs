//! Data structures representing a parsed station summary.
//!
//! This module defines the core types used throughout the application
//! to represent the unit-normalized weather record extracted from a
//! WeatherLink summary page.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical metric units every convertible reading is normalized to.
///
/// This set is closed: a reading whose source unit has no conversion rule
/// keeps its raw text instead of carrying an unknown unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Degrees Celsius
    #[serde(rename = "C")]
    Celsius,
    /// Meters per second
    #[serde(rename = "m/s")]
    MetersPerSecond,
    /// Hectopascals
    #[serde(rename = "hPa")]
    Hectopascals,
    /// Millimeters
    #[serde(rename = "mm")]
    Millimeters,
    /// Millimeters per hour
    #[serde(rename = "mm/h")]
    MillimetersPerHour,
    /// Relative percentage
    #[serde(rename = "%")]
    Percent,
    /// Compass degrees
    #[serde(rename = "deg")]
    Degrees,
    /// Millibars
    #[serde(rename = "mb")]
    Millibars,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Celsius => write!(f, "C"),
            Unit::MetersPerSecond => write!(f, "m/s"),
            Unit::Hectopascals => write!(f, "hPa"),
            Unit::Millimeters => write!(f, "mm"),
            Unit::MillimetersPerHour => write!(f, "mm/h"),
            Unit::Percent => write!(f, "%"),
            Unit::Degrees => write!(f, "deg"),
            Unit::Millibars => write!(f, "mb"),
        }
    }
}

/// A numeric cell value.
///
/// Converted readings are floats; wind-direction degrees and the Calm
/// wind-speed sentinel are integers. Serializes untagged so JSON keeps
/// the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
}

impl CellValue {
    /// The value as a float, regardless of representation.
    pub fn as_f64(&self) -> f64 {
        match self {
            CellValue::Int(v) => *v as f64,
            CellValue::Float(v) => *v,
        }
    }
}

/// One slot of a measurement group.
///
/// A successfully normalized cell carries `value` and `unit`. A cell whose
/// text matched no known value/unit pattern carries only `raw_value`. The
/// high/low slots additionally carry the page's `timestamp` text, and the
/// wind-direction slot carries the compass label in `text`. Absent fields
/// are omitted from JSON entirely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
}

impl ValueCell {
    /// A normalized reading with a canonical unit.
    pub fn reading(value: f64, unit: Unit) -> Self {
        Self {
            value: Some(CellValue::Float(value)),
            unit: Some(unit),
            ..Default::default()
        }
    }

    /// A wind-direction reading: compass label plus integer degrees.
    pub fn degrees(compass: &str, degrees: i64) -> Self {
        Self {
            value: Some(CellValue::Int(degrees)),
            unit: Some(Unit::Degrees),
            text: Some(compass.to_string()),
            ..Default::default()
        }
    }

    /// An unparseable cell, keeping the original text only.
    pub fn raw(raw_value: &str) -> Self {
        Self {
            raw_value: Some(raw_value.to_string()),
            ..Default::default()
        }
    }
}

/// Station Summary slot set: a current reading plus today's high and low,
/// each of which may carry the time-of-day text from the page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryGroup {
    pub current: ValueCell,
    pub today_high: ValueCell,
    pub today_low: ValueCell,
}

/// Wind section slot set: 2-minute and 10-minute averages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindGroup {
    #[serde(rename = "2min")]
    pub two_min: ValueCell,

    #[serde(rename = "10min")]
    pub ten_min: ValueCell,
}

/// Rain section slot set: current rate plus day/storm/month/year totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RainGroup {
    pub current: ValueCell,
    pub day: ValueCell,
    pub storm: ValueCell,
    pub month: ValueCell,
    pub year: ValueCell,
}

/// The slots of one measurement, typed by the section it appeared in.
///
/// The `Default` of each variant is the canonical empty group: every slot
/// present with an all-null cell. Parsing seeds a group from that default
/// and overwrites only the cells it recognizes, so a station without a
/// sensor still emits the full slot set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementGroup {
    Summary(SummaryGroup),
    Wind(WindGroup),
    Rain(RainGroup),
}

impl MeasurementGroup {
    pub fn as_summary(&self) -> Option<&SummaryGroup> {
        match self {
            MeasurementGroup::Summary(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_wind(&self) -> Option<&WindGroup> {
        match self {
            MeasurementGroup::Wind(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_rain(&self) -> Option<&RainGroup> {
        match self {
            MeasurementGroup::Rain(group) => Some(group),
            _ => None,
        }
    }
}

/// Page-level metadata. Both fields stay null when the page omits them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Free-text station label from the page header cell.
    pub station_name: Option<String>,

    /// The page's "Current Conditions as of" timestamp.
    pub observed_at: Option<NaiveDateTime>,
}

/// A parsed, unit-normalized station summary.
///
/// This is the sole artifact the parser produces. It is built fresh per
/// parse from the canonical defaults, populated in one pass over the data
/// table, and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub meta: Meta,

    /// Measurement name (the row label text) to its slot group. A
    /// `BTreeMap` keeps serialization order deterministic.
    pub data: BTreeMap<String, MeasurementGroup>,
}
