use thiserror::Error;
use crate::manager_cwa::errors::CwaError;

#[derive(Error, Debug)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<log4rs::config::runtime::ConfigErrors> for ConfigError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> Self { ConfigError(format!("logger config: {}", e)) }
}
impl From<log::SetLoggerError> for ConfigError {
    fn from(e: log::SetLoggerError) -> Self { ConfigError(format!("logger init: {}", e)) }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}

/// Errors raised while flattening a location's weather elements into series
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{location}/{element}: time entry {entry} has no measurement")]
    MissingMeasurement { location: String, element: String, entry: usize },
    #[error("{location}/{element}: time entry {entry} has {count} measurement keys, expected one")]
    AmbiguousMeasurement { location: String, element: String, entry: usize, count: usize },
    #[error("{location}/{element}: time entry {entry} has key '{found}', expected '{expected}'")]
    InconsistentKey { location: String, element: String, entry: usize, expected: String, found: String },
    #[error("{location}/{element}: time entry {entry} has no DataTime or StartTime")]
    MissingTime { location: String, element: String, entry: usize },
    #[error("{location}/{element}: bad timestamp '{value}': {reason}")]
    Timestamp { location: String, element: String, value: String, reason: String },
    #[error("{location}/{element}: value {value} is not an integer")]
    Value { location: String, element: String, value: String },
}

#[derive(Error, Debug)]
#[error("ChartError: {0}")]
pub struct ChartError(pub String);
impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self { ChartError(e.to_string()) }
}

#[derive(Error, Debug)]
#[error("ReportError: {0}")]
pub struct ReportError(pub String);

#[derive(Error, Debug)]
pub enum WeatherDiaryError {
    #[error(transparent)]
    Cwa(#[from] CwaError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
