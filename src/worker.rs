use chrono::NaiveDate;
use log::info;
use crate::chart::plot_table;
use crate::config::Config;
use crate::errors::{ChartError, WeatherDiaryError};
use crate::manager_cwa::CWA;
use crate::models::cwa_forecast::ForecastPayload;
use crate::report::Report;
use crate::series::{extract_series, ElementSeries};

/// Runs the whole diary: fetch the forecast, then create the report and fill it with
/// one chart row per location and element. Returns the number of rows written.
///
/// Nothing is written before the forecast has been fetched.
///
/// # Arguments
///
/// * 'config' - the configuration
/// * 'api_key' - open data authorization key
/// * 'date' - the run date, used in the report header and in chart file names
pub fn run(config: &Config, api_key: &str, date: NaiveDate) -> Result<usize, WeatherDiaryError> {
    let cwa = CWA::new(api_key, &config.cwa);
    let forecast = cwa.get_forecast(&config.files.snapshot_file)?;

    let report = Report::create(&config.files.report_file, &config.report, date)?;

    assemble(&report, &forecast, |location, series, index| {
        plot_table(&config.chart, &config.files.tables_dir, date, location, series, index)
    })
}

/// Walks the locations in forecast order, renders one chart per element series and
/// appends a report row per chart once all charts of the location are rendered.
///
/// # Arguments
///
/// * 'report' - the report to append rows to
/// * 'forecast' - the decoded forecast
/// * 'render' - renders a series given location name and location index, returning the image path
pub fn assemble<F>(report: &Report, forecast: &ForecastPayload, mut render: F) -> Result<usize, WeatherDiaryError>
where
    F: FnMut(&str, &ElementSeries, usize) -> Result<String, ChartError>,
{
    let mut rows: usize = 0;

    for (index, location) in forecast.locations().unwrap_or_default().iter().enumerate() {
        let series = extract_series(location)?;

        let table_links = series
            .iter()
            .map(|s| render(&location.location_name, s, index))
            .collect::<Result<Vec<String>, ChartError>>()?;

        for link in &table_links {
            report.append_row(&location.location_name, link)?;
            rows += 1;
        }
        info!("{}: {} charts", location.location_name, table_links.len());
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use serde_json::{json, Value};
    use crate::chart::artifact_path;
    use crate::config::ReportParameters;
    use crate::manager_cwa::parse_forecast;
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 28).unwrap()
    }

    fn temperature(location: &str) -> Value {
        json!({
            "LocationName": location,
            "WeatherElement": [{
                "ElementName": "溫度",
                "Time": [
                    {"DataTime": "2025-04-28T12:00:00+08:00", "ElementValue": [{"Temperature": "29"}]},
                    {"DataTime": "2025-04-28T13:00:00+08:00", "ElementValue": [{"Temperature": "30"}]}
                ]
            }]
        })
    }

    fn forecast(locations: Vec<Value>) -> ForecastPayload {
        let doc = json!({"records": {"Locations": [{"LocationsName": "高雄市", "Location": locations}]}});
        parse_forecast(&doc.to_string()).unwrap()
    }

    fn table_rows(path: &str) -> Vec<String> {
        fs::read_to_string(path).unwrap()
            .lines()
            .filter(|l| l.starts_with('|'))
            .map(|l| l.to_string())
            .collect()
    }

    /// Builds a report over the given forecast with a renderer that only computes the image path
    fn build(path: &str, forecast: &ForecastPayload) -> Result<usize, WeatherDiaryError> {
        let report = Report::create(path, &ReportParameters::default(), date()).unwrap();
        assemble(&report, forecast, |_, series, index| Ok(artifact_path("Tables", date(), &series.key, index)))
    }

    #[test]
    fn one_row_per_location_and_element() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        let forecast = forecast(vec![temperature("新興區"), temperature("苓雅區"), temperature("鳳山區")]);
        let rows = build(path, &forecast).unwrap();
        let table = table_rows(path);

        assert_eq!(rows, 3);
        assert_eq!(table.len(), 3 + 2);
        assert!(table[2].starts_with("|新興區|"));
        assert!(table[2].ends_with("/Tables/2025-04-28_Temperature_0.png)|"));
        assert!(table[4].ends_with("/Tables/2025-04-28_Temperature_2.png)|"));
    }

    #[test]
    fn location_without_elements_adds_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        let forecast = forecast(vec![
            temperature("新興區"),
            json!({"LocationName": "旗津區", "WeatherElement": []}),
            temperature("苓雅區"),
        ]);
        let mut rendered: Vec<usize> = Vec::new();
        let report = Report::create(path, &ReportParameters::default(), date()).unwrap();
        let rows = assemble(&report, &forecast, |_, series, index| {
            rendered.push(index);
            Ok(artifact_path("Tables", date(), &series.key, index))
        }).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(rendered, vec![0, 2]);
        assert!(!fs::read_to_string(path).unwrap().contains("旗津區"));
    }

    #[test]
    fn same_input_gives_same_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();
        let forecast = forecast(vec![temperature("新興區"), temperature("苓雅區")]);

        build(path, &forecast).unwrap();
        let first = table_rows(path);
        build(path, &forecast).unwrap();

        assert_eq!(first, table_rows(path));
    }

    #[test]
    fn failure_keeps_rows_written_so_far() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        let bad = json!({
            "LocationName": "三民區",
            "WeatherElement": [{"ElementName": "溫度", "Time": [
                {"DataTime": "2025-04-28T12:00:00+08:00", "ElementValue": [{"Temperature": "n/a"}]}
            ]}]
        });
        let forecast = forecast(vec![temperature("新興區"), bad, temperature("苓雅區")]);

        let result = build(path, &forecast);
        let table = table_rows(path);

        assert!(matches!(result, Err(WeatherDiaryError::Extract(_))));
        assert_eq!(table.len(), 1 + 2);
        assert!(table[2].starts_with("|新興區|"));
    }

    #[test]
    fn render_error_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        let forecast = forecast(vec![temperature("新興區")]);
        let report = Report::create(path, &ReportParameters::default(), date()).unwrap();
        let result = assemble(&report, &forecast, |_, _, _| Err(ChartError("no such directory".to_string())));

        assert!(matches!(result, Err(WeatherDiaryError::Chart(_))));
        assert_eq!(table_rows(path).len(), 2);
    }
}
