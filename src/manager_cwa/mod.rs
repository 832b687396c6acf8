pub mod errors;

use std::fs;
use std::time::Duration;
use log::{debug, info};
use ureq::Agent;
use crate::config::CwaParameters;
use crate::manager_cwa::errors::CwaError;
use crate::models::cwa_forecast::ForecastPayload;

/// Byte order mark written first in every text file this tool produces
pub const UTF8_BOM: &str = "\u{feff}";

/// Struct for fetching township forecasts from the Central Weather Administration open data API
pub struct CWA {
    agent: Agent,
    api_key: String,
    url: String,
    elements: Vec<String>,
}

impl CWA {
    /// Returns a CWA struct ready for fetching forecasts
    ///
    /// # Arguments
    ///
    /// * 'api_key' - the open data authorization key
    /// * 'config' - endpoint, dataset and requested elements
    pub fn new(api_key: &str, config: &CwaParameters) -> CWA {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        let agent = agent_config.into();
        let url = format!("{}/{}", config.endpoint.trim_end_matches('/'), config.dataset);

        Self { agent, api_key: api_key.to_string(), url, elements: config.elements.clone() }
    }

    /// Retrieves the forecast document, saves the raw body to the snapshot file and
    /// returns the decoded payload.
    ///
    /// The snapshot is written before the document is decoded so that a body with an
    /// unexpected shape is still kept on disk.
    ///
    /// # Arguments
    ///
    /// * 'snapshot_file' - path of the file to save the raw document to
    pub fn get_forecast(&self, snapshot_file: &str) -> Result<ForecastPayload, CwaError> {
        debug!("GET {} elements={}", self.url, self.element_query());

        let json = self.agent
            .get(&self.url)
            .query_pairs(self.query())
            .call()?
            .body_mut()
            .read_to_string()?;

        save_snapshot(snapshot_file, &json)?;
        info!("Forecast snapshot saved to {} ({} bytes)", snapshot_file, json.len());

        let payload = parse_forecast(&json)?;
        Ok(payload)
    }

    fn element_query(&self) -> String {
        self.elements.join(",")
    }

    fn query(&self) -> Vec<(&str, String)> {
        vec![
            ("Authorization", self.api_key.clone()),
            ("ElementName", self.element_query()),
            ("format", "JSON".to_string()),
            ("sort", "time".to_string()),
        ]
    }
}

/// Decodes a forecast document and checks that it holds a locations group
///
/// # Arguments
///
/// * 'json' - the raw document
pub fn parse_forecast(json: &str) -> Result<ForecastPayload, CwaError> {
    let payload: ForecastPayload = serde_json::from_str(json.trim_start_matches(UTF8_BOM))?;

    match payload.locations() {
        Some(locations) => {
            info!("Forecast holds {} locations", locations.len());
            Ok(payload)
        }
        None => Err(CwaError::Document("records.Locations is empty".to_string())),
    }
}

/// Writes the raw document with a leading BOM, replacing any earlier snapshot
///
/// # Arguments
///
/// * 'snapshot_file' - path of the snapshot file
/// * 'json' - the raw document
fn save_snapshot(snapshot_file: &str, json: &str) -> Result<(), CwaError> {
    fs::write(snapshot_file, format!("{}{}", UTF8_BOM, json))?;
    Ok(())
}
