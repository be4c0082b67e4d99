//! Value and unit normalization for summary table cells.
//!
//! Cell text on a WeatherLink page mixes unit conventions: imperial readings
//! with a separating space (`"72.7 F"`), metric readings glued to the number
//! (`"62%"`, `"5.0mm/Hour"`), the bare `"Calm"` wind sentinel, and the
//! compass/degrees pair used for wind direction. [`normalize`] turns any of
//! these into a [`ValueCell`] holding a canonical metric unit, falling back
//! to the raw text when nothing matches.

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    sequence::{separated_pair, terminated},
};

use crate::record::{CellValue, Unit, ValueCell};

/// Field-specific override for unit conversion.
///
/// Barometer readings in inches of mercury convert to hectopascals rather
/// than the generic inches-to-millimeters rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHint {
    Barometer,
}

const KNOTS_TO_MPS: f64 = 0.514444444;
const MPH_TO_MPS: f64 = 0.44704;
const INCHES_TO_MM: f64 = 25.4;
const INCHES_HG_TO_HPA: f64 = 33.8639;

/// Unit tokens that appear glued to the number, tried in this order.
/// Order matters: some tokens are substrings of others.
const SUFFIX_UNITS: [&str; 6] = ["%", "hPa", "mm/Hour", "mm", "mb", "\""];

/// Wind-speed sentinel for a station reporting no measurable wind.
const CALM: &str = "Calm";

const NBSP: char = '\u{a0}';
const DEGREE_SIGN: char = '\u{b0}';

/// Parse a signed decimal number.
fn decimal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((opt(char('-')), digit1, opt((char('.'), digit1)))),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

/// Parse the common `"<number> <unit>"` cell form: exactly two tokens
/// separated by a single space.
fn spaced_reading(input: &str) -> IResult<&str, (f64, &str)> {
    separated_pair(decimal, char(' '), take_while1(|c: char| c != ' ')).parse(input)
}

/// Parse a wind-direction pair like `"SW\u{a0}225\u{b0}"`: compass letters
/// and an integer degree reading joined by a non-breaking space.
fn compass_reading(input: &str) -> IResult<&str, (&str, i64)> {
    terminated(
        separated_pair(
            take_while1(|c: char| c.is_ascii_alphabetic()),
            char(NBSP),
            map_res(digit1, |s: &str| s.parse::<i64>()),
        ),
        char(DEGREE_SIGN),
    )
    .parse(input)
}

/// Convert a numeric reading from a source unit token to its canonical
/// metric unit.
///
/// Returns `None` for tokens outside the conversion table. Every actual
/// conversion rounds to one decimal place; identity rules pass the value
/// through untouched.
fn convert(value: f64, token: &str, hint: Option<FieldHint>) -> Option<(f64, Unit)> {
    match token {
        "KT" => Some((round1(value * KNOTS_TO_MPS), Unit::MetersPerSecond)),
        "Mph" => Some((round1(value * MPH_TO_MPS), Unit::MetersPerSecond)),
        "km/h" => Some((round1(value / 3.6), Unit::MetersPerSecond)),
        "F" => Some((round1((value - 32.0) * 5.0 / 9.0), Unit::Celsius)),
        "\"" => match hint {
            Some(FieldHint::Barometer) => {
                Some((round1(value * INCHES_HG_TO_HPA), Unit::Hectopascals))
            }
            None => Some((round1(value * INCHES_TO_MM), Unit::Millimeters)),
        },
        "\"/Hour" => Some((round1(value * INCHES_TO_MM), Unit::MillimetersPerHour)),
        "mm/Hour" => Some((value, Unit::MillimetersPerHour)),
        "mm" => Some((value, Unit::Millimeters)),
        "mb" => Some((value, Unit::Millibars)),
        "%" => Some((value, Unit::Percent)),
        "hPa" => Some((value, Unit::Hectopascals)),
        _ => None,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn calm_cell() -> ValueCell {
    ValueCell {
        value: Some(CellValue::Int(0)),
        unit: Some(Unit::MetersPerSecond),
        raw_value: Some(CALM.to_string()),
        ..Default::default()
    }
}

/// Normalize one cell's text into a [`ValueCell`].
///
/// Pure and deterministic: identical input text and hint always produce the
/// same cell. Attempts, in order:
///
/// 1. the spaced `"<number> <unit>"` form;
/// 2. the glued-suffix forms in priority order, removing every occurrence
///    of the token and requiring the remainder to parse as a number;
/// 3. the `"Calm"` sentinel;
/// 4. the raw-text fallback. Unparseable cells are expected, not errors.
pub fn normalize(raw: &str, hint: Option<FieldHint>) -> ValueCell {
    if let Ok(("", (value, token))) = spaced_reading(raw)
        && let Some((value, unit)) = convert(value, token, hint)
    {
        return ValueCell::reading(value, unit);
    }

    for token in SUFFIX_UNITS {
        if raw.contains(token)
            && let Ok(value) = raw.replace(token, "").parse::<f64>()
            && let Some((value, unit)) = convert(value, token, hint)
        {
            return ValueCell::reading(value, unit);
        }
    }

    if raw == CALM {
        return calm_cell();
    }

    ValueCell::raw(raw)
}

/// Decompose a wind-direction cell into compass text and integer degrees.
///
/// Returns `None` when the text is not the expected compass/degrees pair;
/// the caller keeps the slot's default cell in that case.
pub fn parse_wind_direction(raw: &str) -> Option<ValueCell> {
    match compass_reading(raw) {
        Ok(("", (compass, degrees))) => Some(ValueCell::degrees(compass, degrees)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reading(cell: &ValueCell) -> (f64, Unit) {
        (cell.value.unwrap().as_f64(), cell.unit.unwrap())
    }

    #[test]
    fn test_fahrenheit_to_celsius() {
        let cell = normalize("72.7 F", None);
        assert_eq!(reading(&cell), (22.6, Unit::Celsius));
        assert_eq!(cell.raw_value, None);
    }

    #[test]
    fn test_negative_fahrenheit() {
        let cell = normalize("-5.0 F", None);
        assert_eq!(reading(&cell), (-20.6, Unit::Celsius));
    }

    #[test]
    fn test_knots_to_mps() {
        let cell = normalize("10.0 KT", None);
        assert_eq!(reading(&cell), (5.1, Unit::MetersPerSecond));
    }

    #[test]
    fn test_mph_to_mps() {
        let cell = normalize("10.0 Mph", None);
        assert_eq!(reading(&cell), (4.5, Unit::MetersPerSecond));
    }

    #[test]
    fn test_kmh_to_mps() {
        let cell = normalize("36.0 km/h", None);
        assert_eq!(reading(&cell), (10.0, Unit::MetersPerSecond));
    }

    #[test]
    fn test_inches_to_mm() {
        let cell = normalize("1.40\"", None);
        assert_eq!(reading(&cell), (35.6, Unit::Millimeters));
    }

    #[test]
    fn test_inches_per_hour() {
        let cell = normalize("0.2 \"/Hour", None);
        assert_eq!(reading(&cell), (5.1, Unit::MillimetersPerHour));
    }

    #[test]
    fn test_mm_per_hour_is_renamed_not_scaled() {
        let cell = normalize("5.0mm/Hour", None);
        assert_eq!(reading(&cell), (5.0, Unit::MillimetersPerHour));

        let cell = normalize("5.0 mm/Hour", None);
        assert_eq!(reading(&cell), (5.0, Unit::MillimetersPerHour));
    }

    #[test]
    fn test_glued_metric_suffixes() {
        assert_eq!(reading(&normalize("62%", None)), (62.0, Unit::Percent));
        assert_eq!(
            reading(&normalize("1013.4hPa", None)),
            (1013.4, Unit::Hectopascals)
        );
        assert_eq!(
            reading(&normalize("3.2mm", None)),
            (3.2, Unit::Millimeters)
        );
        assert_eq!(
            reading(&normalize("1013mb", None)),
            (1013.0, Unit::Millibars)
        );
    }

    #[test]
    fn test_barometer_hint_switches_inches_to_hpa() {
        let cell = normalize("29.92\"", Some(FieldHint::Barometer));
        assert_eq!(reading(&cell), (1013.2, Unit::Hectopascals));

        // The same text in any other field converts to millimeters.
        let cell = normalize("29.92\"", None);
        assert_eq!(reading(&cell), (760.0, Unit::Millimeters));
    }

    #[test]
    fn test_calm_sentinel() {
        let cell = normalize("Calm", None);
        assert_eq!(cell.value, Some(CellValue::Int(0)));
        assert_eq!(cell.unit, Some(Unit::MetersPerSecond));
        assert_eq!(cell.raw_value.as_deref(), Some("Calm"));
    }

    #[test]
    fn test_unparseable_text_keeps_raw_value_only() {
        for raw in ["---", "n/a", "Rising Slowly", ""] {
            let cell = normalize(raw, None);
            assert_eq!(cell.value, None, "{:?}", raw);
            assert_eq!(cell.unit, None, "{:?}", raw);
            assert_eq!(cell.raw_value.as_deref(), Some(raw));
        }
    }

    #[test]
    fn test_unknown_spaced_unit_is_not_passed_through() {
        let cell = normalize("5.0 furlongs", None);
        assert_eq!(cell.value, None);
        assert_eq!(cell.unit, None);
        assert_eq!(cell.raw_value.as_deref(), Some("5.0 furlongs"));
    }

    #[test]
    fn test_three_token_text_is_raw() {
        let cell = normalize("72.7 F high", None);
        assert_eq!(cell.raw_value.as_deref(), Some("72.7 F high"));
    }

    #[test]
    fn test_wind_direction_decomposition() {
        let cell = parse_wind_direction("SW\u{a0}225\u{b0}").unwrap();
        assert_eq!(cell.text.as_deref(), Some("SW"));
        assert_eq!(cell.value, Some(CellValue::Int(225)));
        assert_eq!(cell.unit, Some(Unit::Degrees));
    }

    #[test]
    fn test_wind_direction_rejects_wrong_format() {
        assert_eq!(parse_wind_direction("225\u{b0}"), None);
        assert_eq!(parse_wind_direction("SW 225\u{b0}"), None);
        assert_eq!(parse_wind_direction("SW\u{a0}225"), None);
        assert_eq!(parse_wind_direction("Calm"), None);
    }

    proptest! {
        // Converting from a source unit and back lands within the 0.1
        // rounding tolerance of the original reading.

        #[test]
        fn fahrenheit_round_trips(tenths in -400i64..1300) {
            let fahrenheit = tenths as f64 / 10.0;
            let cell = normalize(&format!("{:.1} F", fahrenheit), None);
            let celsius = cell.value.unwrap().as_f64();
            prop_assert!((celsius * 9.0 / 5.0 + 32.0 - fahrenheit).abs() < 0.1);
        }

        #[test]
        fn knots_round_trips(tenths in 0i64..800) {
            let knots = tenths as f64 / 10.0;
            let cell = normalize(&format!("{:.1} KT", knots), None);
            let mps = cell.value.unwrap().as_f64();
            prop_assert!((mps / KNOTS_TO_MPS - knots).abs() < 0.1);
        }

        #[test]
        fn inches_round_trip(hundredths in 0i64..5000) {
            let inches = hundredths as f64 / 100.0;
            let cell = normalize(&format!("{:.2}\"", inches), None);
            let mm = cell.value.unwrap().as_f64();
            prop_assert!((mm / INCHES_TO_MM - inches).abs() < 0.1);
        }

        #[test]
        fn normalize_is_deterministic(tenths in -400i64..1300) {
            let raw = format!("{:.1} F", tenths as f64 / 10.0);
            prop_assert_eq!(normalize(&raw, None), normalize(&raw, None));
        }
    }
}
