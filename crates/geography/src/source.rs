//! Geography sources.
//!
//! A source produces a whole [`GeoCollection`] in one go. Sources are tried in
//! order by [`crate::GeographyStore`]; each one either yields usable features
//! or an error.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::debug;

use crate::error::GeographyError;
use crate::feature::GeoCollection;

/// Primary world boundaries (country polygons).
pub const PRIMARY_WORLD_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";
/// Secondary world boundaries, tried when the primary fails.
pub const SECONDARY_WORLD_URL: &str =
    "https://raw.githubusercontent.com/johan/world.geo.json/master/countries.geo.json";

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait GeographySource: Send + Sync {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    fn fetch(&self) -> BoxFuture<'_, Result<GeoCollection, GeographyError>>;
}

/// Plain HTTP GET of a GeoJSON document.
///
/// No retries and no timeout beyond the transport's own.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl GeographySource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> BoxFuture<'_, Result<GeoCollection, GeographyError>> {
        Box::pin(async move {
            debug!(url = %self.url, "fetching geography");
            let resp = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|source| GeographyError::Request {
                    url: self.url.clone(),
                    source,
                })?;

            if !resp.status().is_success() {
                return Err(GeographyError::Status {
                    url: self.url.clone(),
                    status: resp.status().as_u16(),
                });
            }

            let body = resp.text().await.map_err(|source| GeographyError::Request {
                url: self.url.clone(),
                source,
            })?;
            GeoCollection::from_geojson_str(&body)
        })
    }
}

/// GeoJSON file on local disk.
pub struct FileSource {
    path: PathBuf,
    label: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        Self { path, label }
    }
}

impl GeographySource for FileSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> BoxFuture<'_, Result<GeoCollection, GeographyError>> {
        Box::pin(async move {
            let payload =
                tokio::fs::read_to_string(&self.path)
                    .await
                    .map_err(|source| GeographyError::Io {
                        path: self.path.clone(),
                        source,
                    })?;
            GeoCollection::from_geojson_str(&payload)
        })
    }
}

/// In-memory GeoJSON payload, parsed on every fetch.
pub struct MemorySource {
    name: String,
    payload: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

impl GeographySource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> BoxFuture<'_, Result<GeoCollection, GeographyError>> {
        Box::pin(async move { GeoCollection::from_geojson_str(&self.payload) })
    }
}

#[cfg(test)]
mod tests {
    use super::{FileSource, GeographySource, HttpSource, MemorySource};
    use crate::error::GeographyError;

    const ONE_LINE: &str = r#"{"features":[{"type":"Feature","geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}}]}"#;

    #[tokio::test]
    async fn memory_source_parses_payload() {
        let src = MemorySource::new("mem", ONE_LINE);
        assert_eq!(src.name(), "mem");
        let c = src.fetch().await.expect("fetch");
        assert_eq!(c.len(), 1);
    }

    #[tokio::test]
    async fn file_source_reports_missing_file() {
        let src = FileSource::new("/definitely/not/here/world.geojson");
        let err = src.fetch().await.expect_err("missing");
        assert!(matches!(err, GeographyError::Io { .. }));
    }

    #[tokio::test]
    async fn http_source_reports_connection_failure() {
        // Port 9 (discard) is not served on loopback in test environments.
        let src = HttpSource::new("http://127.0.0.1:9/world.geojson");
        let err = src.fetch().await.expect_err("unreachable");
        assert!(matches!(err, GeographyError::Request { .. }));
    }
}
