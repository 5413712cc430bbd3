/// Typed shapes of the reference API resources
pub mod model;

use std::{future::Future, sync::Mutex, time::Duration};

use futures::future::join_all;
use log::{debug, info, warn};
use serde_json::Value;

use crate::{
    config::PokeApiConfig,
    error::{SheetError, SheetResult},
};

/// Anything that can hand out reference API resources as JSON
///
/// A target is either a path relative to the API root (`pokemon/eevee`)
/// or an absolute reference URL as found inside other resources.
pub trait ResourceSource: Send + Sync {
    /// Fetches a single resource
    fn fetch_json(&self, target: &str) -> impl Future<Output = SheetResult<Value>> + Send;
}

/// Fetches every target concurrently, in input order
/// A failed fetch becomes `None` instead of failing the batch
pub async fn fetch_batch<S, T>(source: &S, targets: &[T]) -> Vec<Option<Value>>
where
    S: ResourceSource,
    T: AsRef<str> + Sync,
{
    let fetches = targets.iter().map(|target| async move {
        match source.fetch_json(target.as_ref()).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Dropping {} from batch: {}", target.as_ref(), e);
                None
            }
        }
    });

    join_all(fetches).await
}

/// HTTP client for the reference API
///
/// Holds one shared connection pool, created on the first fetch and
/// dropped by `release`. A fetch after `release` builds a new pool.
pub struct ApiClient {
    base_url: String,
    fetch_timeout: Duration,
    http: Mutex<Option<reqwest::Client>>,
}

impl ApiClient {
    pub fn new(config: &PokeApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fetch_timeout: config.fetch_timeout(),
            http: Mutex::new(None),
        }
    }

    /// Turns a target into a full URL
    pub fn url_for(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}/{}", self.base_url, target.trim_start_matches('/'))
        }
    }

    /// Drops the shared connection, returns whether there was one
    pub fn release(&self) -> bool {
        match self.http.lock() {
            Ok(mut guard) => {
                let released = guard.take().is_some();
                if released {
                    info!("Released reference API connection");
                }
                released
            }
            Err(_) => false,
        }
    }

    fn connection(&self, url: &str) -> SheetResult<reqwest::Client> {
        let mut guard = self.http.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("pokemon-sheet-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SheetError::Transport {
                url: url.to_string(),
                source,
            })?;

        info!("Opened reference API connection");
        *guard = Some(client.clone());
        Ok(client)
    }

    async fn get(&self, url: String) -> SheetResult<Value> {
        let client = self.connection(&url)?;
        debug!("GET {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|source| SheetError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Remote {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await.map_err(|source| SheetError::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| SheetError::Decode { url, source })
    }
}

impl ResourceSource for ApiClient {
    fn fetch_json(&self, target: &str) -> impl Future<Output = SheetResult<Value>> + Send {
        let url = self.url_for(target);
        async move {
            match tokio::time::timeout(self.fetch_timeout, self.get(url.clone())).await {
                Ok(result) => result,
                Err(_) => Err(SheetError::Timeout { url }),
            }
        }
    }
}
