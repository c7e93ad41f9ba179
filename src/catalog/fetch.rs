//! Reading catalog documents from disk or over HTTP

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;

use crate::core::error::Result;

/// Where one catalog document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Remote(String),
}

impl CatalogSource {
    /// Local path when given, otherwise the remote URL
    pub fn resolve(path: Option<&Path>, url: String) -> Self {
        match path {
            Some(path) => CatalogSource::File(path.to_path_buf()),
            None => CatalogSource::Remote(url),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, CatalogSource::Remote(_))
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// HTTP client with the catalog timeout applied to every request
pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Raw document text
pub async fn read_source(client: &Client, source: &CatalogSource) -> Result<String> {
    match source {
        CatalogSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
        CatalogSource::Remote(url) => {
            tracing::debug!(url = %url, "fetching catalog");
            let response = client.get(url).send().await?.error_for_status()?;
            Ok(response.text().await?)
        }
    }
}
