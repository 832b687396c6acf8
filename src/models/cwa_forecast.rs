use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize, Debug)]
pub struct TimeEntry {
    #[serde(rename = "DataTime")]
    pub data_time: Option<String>,
    #[serde(rename = "StartTime")]
    pub start_time: Option<String>,
    #[serde(rename = "ElementValue", default)]
    pub element_value: Vec<Map<String, Value>>,
}

impl TimeEntry {
    /// Returns the time stamp of the entry, hourly elements carry DataTime while
    /// elements aggregated over a window carry StartTime
    pub fn time(&self) -> Option<&str> {
        self.data_time.as_deref().or(self.start_time.as_deref())
    }
}

#[derive(Deserialize, Debug)]
pub struct WeatherElement {
    #[serde(rename = "ElementName")]
    pub element_name: String,
    #[serde(rename = "Time", default)]
    pub time: Vec<TimeEntry>,
}

#[derive(Deserialize, Debug)]
pub struct LocationRecord {
    #[serde(rename = "LocationName")]
    pub location_name: String,
    #[serde(rename = "WeatherElement", default)]
    pub weather_element: Vec<WeatherElement>,
}

#[derive(Deserialize, Debug)]
pub struct Locations {
    #[serde(rename = "Location")]
    pub location: Vec<LocationRecord>,
}

#[derive(Deserialize, Debug)]
pub struct Records {
    #[serde(rename = "Locations")]
    pub locations: Vec<Locations>,
}

#[derive(Deserialize, Debug)]
pub struct ForecastPayload {
    pub records: Records,
}

impl ForecastPayload {
    /// Returns the locations of the first (and for a county dataset, only) locations group
    pub fn locations(&self) -> Option<&[LocationRecord]> {
        self.records.locations.first().map(|l| l.location.as_slice())
    }
}
