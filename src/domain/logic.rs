// src/domain/logic.rs

use crate::domain::listing::{ListingRecord, NormalizedRecord};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static TYPOLOGY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T[0-9]+").expect("typology pattern is valid"));

/// Which segment of a comma-separated location chain is kept.
/// For chains like "Lisboa, Areeiro, Portugal", `Last` yields "Portugal".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationSegment {
    First,
    #[default]
    Last,
}

impl FromStr for LocationSegment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(LocationSegment::First),
            "last" => Ok(LocationSegment::Last),
            other => Err(format!("unknown location segment '{other}' (expected first|last)")),
        }
    }
}

/// Splits "350 000 €" into ("350 000 ", "€"): the leading run of digits,
/// whitespace and separators, then whatever unit text follows.
fn split_numeric_prefix(raw: &str) -> (&str, &str) {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || c.is_whitespace() || *c == '.' || *c == ','))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw.split_at(end)
}

/// "350 000 €" -> 350000. Thousands separators may be spaces, no-break
/// spaces, dots or commas. Cents ("350 000,50 €") are cut off.
pub fn parse_price(raw: &str) -> Option<u64> {
    let (number, _unit) = split_numeric_prefix(raw);
    let number = strip_cents(number.trim_end());
    let digits: String = number
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == '.' || *c == ','))
        .collect();

    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// A final separator followed by one or two digits is a decimal part,
/// never grouping, which always takes three.
fn strip_cents(number: &str) -> &str {
    match number.rfind(['.', ',']) {
        Some(at) => {
            let tail = &number[at + 1..];
            if (1..=2).contains(&tail.len()) && tail.bytes().all(|b| b.is_ascii_digit()) {
                &number[..at]
            } else {
                number
            }
        }
        None => number,
    }
}

/// "85,5 m²" -> 85.5
pub fn parse_area(raw: &str) -> Option<f64> {
    let (number, _unit) = split_numeric_prefix(raw);
    let canonical: String = number
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if canonical.is_empty() {
        return None;
    }
    canonical
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

pub fn location_segment(raw: &str, segment: LocationSegment) -> Option<String> {
    let mut parts = raw.split(", ");
    let picked = match segment {
        LocationSegment::First => parts.next(),
        LocationSegment::Last => parts.last(),
    }?;

    let picked = picked.trim();
    if picked.is_empty() {
        None
    } else {
        Some(picked.to_string())
    }
}

/// First "T<digits>" code in a listing name, e.g. "T3 Apartamento" -> "T3".
pub fn extract_typology(name: &str) -> Option<String> {
    TYPOLOGY.find(name).map(|m| m.as_str().to_string())
}

/// All four fields parse or the whole row is rejected.
pub fn normalize_record(record: &ListingRecord, segment: LocationSegment) -> Option<NormalizedRecord> {
    Some(NormalizedRecord {
        price: parse_price(&record.price)?,
        area: parse_area(&record.area)?,
        location: location_segment(&record.location, segment)?,
        name: extract_typology(&record.name)?,
    })
}
