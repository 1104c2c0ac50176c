use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::config::ResourceSet;
use crate::error::LoadError;

/// The four resource texts, passed verbatim to the engine constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBundle {
    pub pu: String,
    pub nimi_pu: String,
    pub compounds: String,
    pub model: String,
}

impl ResourceBundle {
    pub fn total_len(&self) -> usize {
        self.pu.len() + self.nimi_pu.len() + self.compounds.len() + self.model.len()
    }
}

/// Retrieves a static text resource by path
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String>;
}

/// Fetches resources over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self
            .base
            .join(path)
            .with_context(|| format!("Invalid resource path: {path}"))?;

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!("Fetch error for {}: {:?}", url, e);
            anyhow::anyhow!("Failed to fetch URL: {} - Error: {}", url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error for {}: status {}", url, status);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

/// Reads resources from a local directory.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<data dir>/toki-sama`, falling back to the working directory
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toki-sama")
    }
}

#[async_trait]
impl ResourceFetcher for DirFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let full_path = self.root.join(path);
        tokio::fs::read_to_string(&full_path)
            .await
            .with_context(|| format!("Failed to read {full_path:?}"))
    }
}

/// Fetch all four resources concurrently. Succeeds only when every fetch
/// does; the whole join is bounded by `timeout`.
pub async fn load_bundle(
    fetcher: &dyn ResourceFetcher,
    resources: &ResourceSet,
    timeout: Duration,
) -> Result<ResourceBundle, LoadError> {
    info!("Loading resources: {:?}", resources);

    let join = async {
        tokio::try_join!(
            fetch_one(fetcher, &resources.pu),
            fetch_one(fetcher, &resources.nimi_pu),
            fetch_one(fetcher, &resources.compounds),
            fetch_one(fetcher, &resources.model),
        )
    };

    let (pu, nimi_pu, compounds, model) = tokio::time::timeout(timeout, join)
        .await
        .map_err(|_| LoadError::Timeout(timeout))??;

    let bundle = ResourceBundle {
        pu,
        nimi_pu,
        compounds,
        model,
    };
    info!("Loaded {} bytes of resources", bundle.total_len());
    Ok(bundle)
}

async fn fetch_one(fetcher: &dyn ResourceFetcher, path: &str) -> Result<String, LoadError> {
    fetcher
        .fetch_text(path)
        .await
        .map_err(|e| LoadError::Fetch {
            path: path.to_string(),
            reason: format!("{e:#}"),
        })
}

/// `Url::join` drops the last segment unless the base ends with a slash.
fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
