//! Single shared query client for the graph endpoint. Queries follow a
//! stale-then-fresh policy: a matching cached snapshot is yielded
//! immediately, the network is revalidated concurrently, and a second
//! update is emitted only when the fresh data differs from the snapshot.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

pub mod cache;
pub mod derive;
pub mod wire;

use cache::GraphCache;
use shared::graph::{CountryDetail, CountrySummary};
use wire::{CountriesData, CountryData, GraphRequest, GraphResponse, GET_COUNTRIES, GET_COUNTRY};

#[derive(Debug, Error)]
pub enum GraphQueryError {
    #[error("graph request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("graph endpoint returned status {0}")]
    Status(StatusCode),
    #[error("failed to decode graph response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("graph server reported: {0}")]
    Server(String),
    #[error("graph response carried no data")]
    MissingData,
    #[error("unexpected graph data shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// One observer update from a stale-then-fresh query execution.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryUpdate<T> {
    /// Snapshot served from the cache before any network round trip.
    Cached(T),
    /// Network result that differed from the cached snapshot (or had no
    /// snapshot to compare against).
    Fresh(T),
}

impl<T> QueryUpdate<T> {
    pub fn into_value(self) -> T {
        match self {
            QueryUpdate::Cached(value) | QueryUpdate::Fresh(value) => value,
        }
    }
}

pub type QueryStream<T> = mpsc::Receiver<Result<QueryUpdate<T>, GraphQueryError>>;

pub struct GraphClient {
    http: Client,
    endpoint: String,
    cache: RwLock<GraphCache>,
}

impl GraphClient {
    pub fn new(endpoint: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            cache: RwLock::new(GraphCache::new()),
        })
    }

    /// Named read: list all entities. Emits at most two updates and then
    /// closes; a failed revalidation emits the error instead (no retry).
    pub fn subscribe_countries(self: &Arc<Self>) -> QueryStream<Vec<CountrySummary>> {
        let (tx, rx) = mpsc::channel(4);
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let cached = client.cache.read().await.read_countries();
            if let Some(snapshot) = cached.clone() {
                debug!(countries = snapshot.len(), "serving cached country list");
                let _ = tx.send(Ok(QueryUpdate::Cached(snapshot))).await;
            }

            match client.fetch_countries().await {
                Ok(fresh) => {
                    client.cache.write().await.write_countries(&fresh);
                    if cached.as_ref() != Some(&fresh) {
                        let _ = tx.send(Ok(QueryUpdate::Fresh(fresh))).await;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "country list revalidation failed");
                    let _ = tx.send(Err(err)).await;
                }
            }
        });
        rx
    }

    /// Named read: entity by identifier. `None` means the endpoint knows no
    /// such entity; that is data, not an error, and evicts any record the
    /// cache still holds for the code.
    pub fn subscribe_country(self: &Arc<Self>, code: &str) -> QueryStream<Option<CountryDetail>> {
        let (tx, rx) = mpsc::channel(4);
        let client = Arc::clone(self);
        let code = code.to_string();
        tokio::spawn(async move {
            let cached = client.cache.read().await.read_country(&code);
            if let Some(snapshot) = cached.clone() {
                debug!(%code, "serving cached country detail");
                let _ = tx.send(Ok(QueryUpdate::Cached(Some(snapshot)))).await;
            }

            match client.fetch_country(&code).await {
                Ok(fresh) => {
                    match &fresh {
                        Some(detail) => client.cache.write().await.write_country(detail),
                        // The entity is gone upstream; evict the record so a
                        // later query does not re-serve the dead snapshot.
                        None => client.cache.write().await.remove_country(&code),
                    }
                    let changed = match &cached {
                        Some(snapshot) => fresh.as_ref() != Some(snapshot),
                        None => true,
                    };
                    if changed {
                        let _ = tx.send(Ok(QueryUpdate::Fresh(fresh))).await;
                    }
                }
                Err(err) => {
                    warn!(%code, error = %err, "country detail revalidation failed");
                    let _ = tx.send(Err(err)).await;
                }
            }
        });
        rx
    }

    async fn fetch_countries(&self) -> Result<Vec<CountrySummary>, GraphQueryError> {
        let data: CountriesData = self.post_query(GET_COUNTRIES, None).await?;
        Ok(data.countries)
    }

    async fn fetch_country(&self, code: &str) -> Result<Option<CountryDetail>, GraphQueryError> {
        let data: CountryData = self
            .post_query(GET_COUNTRY, Some(json!({ "code": code })))
            .await?;
        Ok(data.country)
    }

    async fn post_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<T, GraphQueryError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GraphRequest { query, variables })
            .send()
            .await
            .map_err(GraphQueryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GraphQueryError::Status(status));
        }

        let body: GraphResponse = response.json().await.map_err(GraphQueryError::Decode)?;
        if let Some(first) = body.errors.first() {
            return Err(GraphQueryError::Server(first.message.clone()));
        }
        let data = body.data.ok_or(GraphQueryError::MissingData)?;
        serde_json::from_value(data).map_err(GraphQueryError::Shape)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
