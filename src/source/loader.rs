//! Record source retrieval.
//!
//! A source is either an `http(s)://` URL fetched with reqwest or a local
//! file path. Either way the text is decoded with the CSV decoder.

use super::decoder::decode_records;
use super::error::SourceError;
use crate::models::RawRow;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Where the survey records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    Path(PathBuf),
}

impl SourceLocation {
    /// Classify a location string. Anything that is not an HTTP(S) URL is
    /// treated as a filesystem path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            SourceLocation::Url(location.to_string())
        } else {
            SourceLocation::Path(PathBuf::from(location))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => write!(f, "{}", url),
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A cloneable handle to the record source.
///
/// Cloning shares the underlying HTTP connection pool, so a clone can be
/// moved into a pending future while the dashboard keeps its own copy.
#[derive(Debug, Clone)]
pub struct RecordSource {
    location: SourceLocation,
    http_client: reqwest::Client,
}

impl RecordSource {
    /// Create a source for `location` with the given HTTP request timeout.
    pub fn new(location: &str, timeout: Duration) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            location: SourceLocation::parse(location),
            http_client,
        })
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Retrieve the raw delimited text.
    pub async fn fetch_text(&self) -> Result<String, SourceError> {
        match &self.location {
            SourceLocation::Url(url) => self.fetch_url(url).await,
            SourceLocation::Path(path) => {
                debug!("Reading records from {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String, SourceError> {
        debug!("Downloading records from {}", url);

        let network = |source: reqwest::Error| SourceError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.http_client.get(url).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(network)
    }

    /// Retrieve and decode the records.
    pub async fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
        let text = self.fetch_text().await?;
        let rows = decode_records(&text)?;
        info!("Decoded {} rows from {}", rows.len(), self.location);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FIXTURE: &str = include_str!("../../fixtures/salaries.csv");

    fn timeout() -> Duration {
        Duration::from_secs(5)
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(
            SourceLocation::parse("https://example.com/salaries.csv"),
            SourceLocation::Url("https://example.com/salaries.csv".to_string())
        );
        assert_eq!(
            SourceLocation::parse("data/salaries.csv"),
            SourceLocation::Path(PathBuf::from("data/salaries.csv"))
        );
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let source = RecordSource::new(file.path().to_str().unwrap(), timeout()).unwrap();
        let rows = source.fetch().await.unwrap();

        assert_eq!(rows.len(), 12);
    }

    #[test]
    fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");

        let source = RecordSource::new(missing.to_str().unwrap(), timeout()).unwrap();
        let err = tokio_test::block_on(source.fetch()).unwrap_err();

        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_fetch_from_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/salaries.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
            .mount(&mock_server)
            .await;

        let url = format!("{}/salaries.csv", mock_server.uri());
        let source = RecordSource::new(&url, timeout()).unwrap();
        let rows = source.fetch().await.unwrap();

        assert_eq!(rows.len(), 12);
        assert_eq!(source.location(), &SourceLocation::Url(url));
    }

    #[tokio::test]
    async fn test_fetch_url_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/salaries.csv", mock_server.uri());
        let source = RecordSource::new(&url, timeout()).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, SourceError::Status { status: 404, .. }));
    }
}
