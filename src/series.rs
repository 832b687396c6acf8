use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};
use crate::errors::ExtractError;
use crate::models::cwa_forecast::{LocationRecord, TimeEntry, WeatherElement};

/// Label format of a sample on the chart x axis, e.g. "04/28 12"
const LABEL_FORMAT: &str = "%m/%d %H";

/// One (time, value) point of an element series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub label: String,
    pub value: i64,
}

/// Samples of one weather element at one location, in API order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSeries {
    /// Localized name, e.g. 溫度
    pub name: String,
    /// Canonical measurement key, e.g. Temperature
    pub key: String,
    pub samples: Vec<Sample>,
}

impl ElementSeries {
    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

/// A single measurement-name/value pair taken out of an ElementValue mapping
#[derive(Debug, PartialEq)]
pub struct Measurement<'a> {
    pub key: &'a str,
    pub value: &'a Value,
}

impl<'a> Measurement<'a> {
    /// Returns the one pair of the mapping, None if the mapping is empty and
    /// Err(count) if it holds more than one pair
    pub fn from_map(map: &'a Map<String, Value>) -> Result<Option<Measurement<'a>>, usize> {
        let mut iter = map.iter();
        match (iter.next(), map.len()) {
            (None, _) => Ok(None),
            (Some((key, value)), 1) => Ok(Some(Measurement { key, value })),
            (Some(_), count) => Err(count),
        }
    }
}

/// Flattens all weather elements of a location into series, one per element and in
/// the order the API returned them.
///
/// # Arguments
///
/// * 'location' - the location record to flatten
pub fn extract_series(location: &LocationRecord) -> Result<Vec<ElementSeries>, ExtractError> {
    location.weather_element
        .iter()
        .map(|e| extract_element(&location.location_name, e))
        .collect()
}

/// Builds the series for one element.
///
/// The canonical key is read from the first time entry, every following entry must
/// carry the same key. An element without time entries yields an empty key and no samples.
///
/// # Arguments
///
/// * 'location' - location name, used in error messages
/// * 'element' - the element to flatten
fn extract_element(location: &str, element: &WeatherElement) -> Result<ElementSeries, ExtractError> {
    let mut key: Option<String> = None;
    let mut samples: Vec<Sample> = Vec::with_capacity(element.time.len());

    for (i, entry) in element.time.iter().enumerate() {
        let measurement = measurement(location, &element.element_name, i, entry)?;

        match &key {
            None => key = Some(measurement.key.to_string()),
            Some(k) if k != measurement.key => {
                return Err(ExtractError::InconsistentKey {
                    location: location.to_string(),
                    element: element.element_name.clone(),
                    entry: i,
                    expected: k.clone(),
                    found: measurement.key.to_string(),
                });
            }
            Some(_) => {}
        }

        let label = entry_label(location, &element.element_name, i, entry)?;
        let value = to_integer(measurement.value).ok_or_else(|| ExtractError::Value {
            location: location.to_string(),
            element: element.element_name.clone(),
            value: measurement.value.to_string(),
        })?;

        samples.push(Sample { label, value });
    }

    Ok(ElementSeries {
        name: element.element_name.clone(),
        key: key.unwrap_or_default(),
        samples,
    })
}

/// Returns the measurement of the first ElementValue mapping of an entry
fn measurement<'a>(location: &str, element: &str, i: usize, entry: &'a TimeEntry) -> Result<Measurement<'a>, ExtractError> {
    let missing = || ExtractError::MissingMeasurement {
        location: location.to_string(),
        element: element.to_string(),
        entry: i,
    };

    let map = entry.element_value.first().ok_or_else(missing)?;
    match Measurement::from_map(map) {
        Ok(Some(m)) => Ok(m),
        Ok(None) => Err(missing()),
        Err(count) => Err(ExtractError::AmbiguousMeasurement {
            location: location.to_string(),
            element: element.to_string(),
            entry: i,
            count,
        }),
    }
}

fn entry_label(location: &str, element: &str, i: usize, entry: &TimeEntry) -> Result<String, ExtractError> {
    let time = entry.time().ok_or_else(|| ExtractError::MissingTime {
        location: location.to_string(),
        element: element.to_string(),
        entry: i,
    })?;

    time_label(time).map_err(|reason| ExtractError::Timestamp {
        location: location.to_string(),
        element: element.to_string(),
        value: time.to_string(),
        reason,
    })
}

/// Formats an ISO 8601 time stamp as "MM/DD HH" in the wall clock time it was written in.
///
/// Time stamps without an offset, without seconds, and with a space instead of 'T', are
/// accepted as well.
///
/// # Arguments
///
/// * 'time' - the time stamp, e.g. "2025-04-28T12:00:00+08:00"
pub fn time_label(time: &str) -> Result<String, String> {
    let time = time.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Ok(dt.format(LABEL_FORMAT).to_string());
    }

    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt.format(LABEL_FORMAT).to_string());
    }

    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M"))
        .map(|dt| dt.format(LABEL_FORMAT).to_string())
        .map_err(|e| e.to_string())
}

/// Coerces a measurement value to an integer.
///
/// Strings are trimmed and parsed, numbers with a fraction are truncated toward zero.
fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    }
}
