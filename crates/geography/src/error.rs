use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GeographyError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid GeoJSON: {0}")]
    Parse(String),
    #[error("payload has no usable features")]
    NoUsableFeatures,
}
