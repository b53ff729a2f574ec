//! Document and file retrieval for vibezip.
//! Handles both local filesystem documents and documents served over HTTP(S).
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Represents the source location of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Local filesystem document path
    FileSystem(PathBuf),
    /// HTTP or HTTPS URL
    Remote(String),
}

impl std::fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            DocumentSource::Remote(url) => write!(f, "url: '{url}'"),
        }
    }
}

impl DocumentSource {
    /// Creates a DocumentSource from a string path or URL.
    ///
    /// Only `http` and `https` URLs are remote; anything else, including
    /// Windows paths such as `C:\docs\zip.txt`, is a filesystem path.
    pub fn from_string(s: &str) -> Self {
        if let Ok(url) = Url::parse(s) {
            if url.scheme() == "http" || url.scheme() == "https" {
                return Self::Remote(s.to_string());
            }
        }
        Self::FileSystem(PathBuf::from(s))
    }
}

/// Retrieves remote content.
pub trait Fetcher {
    /// Fetches the resource at `url` as UTF-8 text.
    fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetches the resource at `url` as raw bytes.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher with a bounded timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a new HttpFetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vibezip/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ConfigError(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        debug!("Fetching '{}'", url);
        let transport = |e: reqwest::Error| Error::TransportFailure {
            url: url.to_string(),
            message: e.to_string(),
        };
        self.client.get(url).send().map_err(transport)?.error_for_status().map_err(transport)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        self.get(url)?.text().map_err(|e| Error::TransportFailure {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.get(url)?.bytes().map(|bytes| bytes.to_vec()).map_err(|e| {
            Error::TransportFailure { url: url.to_string(), message: e.to_string() }
        })
    }
}

/// Reads the document text from the given source.
///
/// # Errors
/// * `Error::DocumentNotFound` if a local path does not exist
/// * `Error::TransportFailure` if a remote document cannot be fetched
pub fn load_document(fetcher: &dyn Fetcher, source: &DocumentSource) -> Result<String> {
    match source {
        DocumentSource::FileSystem(path) => {
            if !path.is_file() {
                return Err(Error::DocumentNotFound { path: path.display().to_string() });
            }
            debug!("Reading document from '{}'", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        DocumentSource::Remote(url) => fetcher.fetch_text(url),
    }
}
