use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use chrono::NaiveDate;
use crate::config::ReportParameters;
use crate::errors::ReportError;
use crate::manager_cwa::UTF8_BOM;

/// Markdown report with one table row per chart.
///
/// Rows are appended one at a time, so an aborted run leaves a valid table holding
/// the rows written so far.
pub struct Report {
    path: String,
    project_link: String,
    image_alt: String,
}

impl Report {
    /// Creates (or truncates) the report file and writes its dated header and the table header
    ///
    /// # Arguments
    ///
    /// * 'path' - path of the report file
    /// * 'params' - region name, description and link settings
    /// * 'date' - the run date
    pub fn create(path: &str, params: &ReportParameters, date: NaiveDate) -> Result<Report, ReportError> {
        fs::write(path, format!("{}{}", UTF8_BOM, header(params, date)))
            .map_err(|e| ReportError(format!("can't create {}: {}", path, e)))?;

        Ok(Report {
            path: path.to_string(),
            project_link: params.project_link.trim_end_matches('/').to_string(),
            image_alt: params.image_alt.clone(),
        })
    }

    /// Appends one table row linking a chart image
    ///
    /// # Arguments
    ///
    /// * 'location' - district name for the first column
    /// * 'artifact' - path of the chart image relative to the project root
    pub fn append_row(&self, location: &str, artifact: &str) -> Result<(), ReportError> {
        OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(self.row(location, artifact).as_bytes()))
            .map_err(|e| ReportError(format!("can't append to {}: {}", self.path, e)))
    }

    fn row(&self, location: &str, artifact: &str) -> String {
        format!("|{}|![{}]({}/{})|\n", location, self.image_alt, self.project_link, artifact)
    }
}

fn header(params: &ReportParameters, date: NaiveDate) -> String {
    format!("# {} {}天氣預報\n\n{}\n\n|區里|預報圖|\n|:-:|:-:|\n",
            date.format("%Y-%m-%d"), params.region_name, params.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 28).unwrap()
    }

    #[test]
    fn create_writes_bom_header_and_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        Report::create(path, &ReportParameters::default(), date()).unwrap();
        let md = fs::read_to_string(path).unwrap();

        assert!(md.starts_with(UTF8_BOM));
        assert_eq!(&md[UTF8_BOM.len()..],
                   "# 2025-04-28 高雄天氣預報\n\n一個託付的每日自動更新氣象資料的專案\n\n|區里|預報圖|\n|:-:|:-:|\n");
    }

    #[test]
    fn rows_are_appended_without_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        let params = ReportParameters { project_link: "https://example.org/diary/".to_string(), ..ReportParameters::default() };
        let report = Report::create(path, &params, date()).unwrap();
        report.append_row("鳳山區", "Tables/2025-04-28_Temperature_0.png").unwrap();
        report.append_row("三民區", "Tables/2025-04-28_Temperature_1.png").unwrap();

        let md = fs::read_to_string(path).unwrap();
        let rows: Vec<&str> = md.lines().filter(|l| l.starts_with('|')).collect();

        assert_eq!(md.matches(UTF8_BOM).count(), 1);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], "|鳳山區|![該區每小時變化圖](https://example.org/diary/Tables/2025-04-28_Temperature_0.png)|");
        assert_eq!(rows[3], "|三民區|![該區每小時變化圖](https://example.org/diary/Tables/2025-04-28_Temperature_1.png)|");
    }

    #[test]
    fn create_truncates_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        let report = Report::create(path, &ReportParameters::default(), date()).unwrap();
        report.append_row("鳳山區", "Tables/a.png").unwrap();
        Report::create(path, &ReportParameters::default(), date()).unwrap();

        assert!(!fs::read_to_string(path).unwrap().contains("鳳山區"));
    }

    #[test]
    fn append_to_removed_report_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.md");
        let path = path.to_str().unwrap();

        let report = Report::create(path, &ReportParameters::default(), date()).unwrap();
        fs::remove_file(path).unwrap();
        let err = report.append_row("鳳山區", "Tables/a.png").unwrap_err();

        assert!(err.to_string().contains(path));
    }

    #[test]
    fn create_in_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("weather.md");

        assert!(Report::create(path.to_str().unwrap(), &ReportParameters::default(), date()).is_err());
    }
}
