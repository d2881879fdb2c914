use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use folio_core::{Error, RecordStore, Result, COLLECTION};
use url::Url;

pub mod backends;

pub use backends::*;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a remote record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} cannot be used as a base URL", base_url)));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{base}/blogs`
    pub fn collection_url(&self) -> Url {
        self.join(&[COLLECTION])
    }

    /// `{base}/blogs/{id}`
    pub fn record_url(&self, id: &str) -> Url {
        self.join(&[COLLECTION, id])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `host:port` of the base URL, for user-facing hints.
    pub fn authority(&self) -> String {
        match (self.base_url.host_str(), self.base_url.port_or_known_default()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            _ => self.base_url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Http,
    Memory,
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Storage(format!("Unknown store backend: {}", other))),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

pub fn create_store(kind: StoreKind, config: StoreConfig) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match kind {
        StoreKind::Http => Arc::new(HttpStore::new(config)?),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::debug!("Using {} record store", store.name());
    Ok(store)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, StoreConfig, StoreKind};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_urls() {
        let config = StoreConfig::new("http://localhost:3001").unwrap();
        assert_eq!(config.collection_url().as_str(), "http://localhost:3001/blogs");
        assert_eq!(config.record_url("7").as_str(), "http://localhost:3001/blogs/7");
        assert_eq!(config.authority(), "localhost:3001");

        let config = StoreConfig::new("http://example.com/api/").unwrap();
        assert_eq!(config.collection_url().as_str(), "http://example.com/api/blogs");
        assert_eq!(config.authority(), "example.com:80");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(StoreConfig::new("not a url"), Err(Error::InvalidUrl(_))));
        assert!(matches!(StoreConfig::new("mailto:someone@example.com"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_store_kind() {
        assert_eq!("HTTP".parse::<StoreKind>().unwrap(), StoreKind::Http);
        assert_eq!("memory".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert!("qdrant".parse::<StoreKind>().is_err());
    }
}
