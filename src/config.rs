use std::{env, fs};
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

/// Environment variable holding the CWA open data authorization key
pub const API_KEY_VAR: &str = "CWA_API_KEY";

#[derive(Deserialize)]
#[serde(default)]
pub struct CwaParameters {
    pub endpoint: String,
    pub dataset: String,
    pub elements: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for CwaParameters {
    fn default() -> Self {
        Self {
            endpoint: "https://opendata.cwa.gov.tw/api/v1/rest/datastore".to_string(),
            dataset: "F-D0047-065".to_string(),
            elements: ["溫度", "體感溫度", "相對濕度", "降雨機率"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Files {
    pub snapshot_file: String,
    pub report_file: String,
    pub tables_dir: String,
}

impl Default for Files {
    fn default() -> Self {
        Self {
            snapshot_file: "KS_3day_weather_forecast_data.json".to_string(),
            report_file: "weather.md".to_string(),
            tables_dir: "Tables".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ReportParameters {
    pub project_link: String,
    pub region_name: String,
    pub description: String,
    pub image_alt: String,
}

impl Default for ReportParameters {
    fn default() -> Self {
        Self {
            project_link: "https://github.com/Li732375/weather_diary".to_string(),
            region_name: "高雄".to_string(),
            description: "一個託付的每日自動更新氣象資料的專案".to_string(),
            image_alt: "該區每小時變化圖".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ChartParameters {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
}

impl Default for ChartParameters {
    fn default() -> Self {
        Self { width: 2800, height: 1200, font_family: "sans-serif".to_string() }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

impl Default for General {
    fn default() -> Self {
        Self { log_path: "weather_diary.log".to_string(), log_level: LevelFilter::Info, log_to_stdout: true }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub cwa: CwaParameters,
    pub files: Files,
    pub report: ReportParameters,
    pub chart: ChartParameters,
    pub general: General,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| ConfigError(format!("can't read {}: {}", config_path, e)))?;
    let config: Config = toml::from_str(&toml)?;

    if config.cwa.elements.is_empty() {
        return Err(ConfigError::from("no weather elements configured"));
    }

    Ok(config)
}

/// Reads the API key from the environment
///
pub fn load_api_key() -> Result<String, ConfigError> {
    let key = env::var(API_KEY_VAR)
        .map_err(|e| ConfigError(format!("error getting {}: {}", API_KEY_VAR, e)))?;

    if key.trim().is_empty() {
        Err(ConfigError(format!("{} is empty", API_KEY_VAR)))
    } else {
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(r#"
            [files]
            tables_dir = "charts"

            [general]
            log_level = "debug"
        "#).unwrap();

        assert_eq!(config.files.tables_dir, "charts");
        assert_eq!(config.files.report_file, "weather.md");
        assert_eq!(config.cwa.dataset, "F-D0047-065");
        assert_eq!(config.cwa.elements.len(), 4);
        assert_eq!(config.general.log_level, LevelFilter::Debug);
        assert_eq!(config.report.region_name, "高雄");
    }

    #[test]
    fn load_config_rejects_empty_element_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[cwa]\nelements = []\n").unwrap();

        assert!(load_config(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn load_config_missing_file_is_error() {
        assert!(load_config("/nonexistent/weather_diary/config.toml").is_err());
    }
}
