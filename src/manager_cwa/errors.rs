use thiserror::Error;

#[derive(Error, Debug)]
pub enum CwaError {
    #[error("CwaError::Request: {0}")]
    Request(String),
    #[error("CwaError::Document: {0}")]
    Document(String),
    #[error("CwaError::Snapshot: {0}")]
    Snapshot(String),
}
impl From<ureq::Error> for CwaError {
    fn from(e: ureq::Error) -> CwaError {
        CwaError::Request(format!("http request error: {}", e))
    }
}
impl From<serde_json::Error> for CwaError {
    fn from(e: serde_json::Error) -> CwaError {
        CwaError::Document(format!("json document error: {}", e))
    }
}
impl From<std::io::Error> for CwaError {
    fn from(e: std::io::Error) -> CwaError {
        CwaError::Snapshot(e.to_string())
    }
}
