//! Transport for the flat REST resource API plus the shared FetchPlan
//! executor: every route describes the resources it needs as one ordered
//! plan, the executor fires all requests concurrently and joins them, and
//! the first failure collapses the whole plan.

use std::collections::HashMap;

use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request for {key} failed: {source}")]
    Request {
        key: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{key} returned status {status}")]
    Status { key: &'static str, status: StatusCode },
    #[error("failed to decode {key} response: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("plan produced no value for {key}")]
    MissingResource { key: &'static str },
    #[error("unexpected shape for {key}: {source}")]
    Shape {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    pub fn key(&self) -> &'static str {
        match self {
            TransportError::Request { key, .. }
            | TransportError::Status { key, .. }
            | TransportError::Decode { key, .. }
            | TransportError::MissingResource { key }
            | TransportError::Shape { key, .. } => key,
        }
    }
}

/// One resource a route needs: a stable key for lookups and error messages,
/// and the URL to GET.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub key: &'static str,
    pub url: String,
}

impl ResourceSpec {
    pub fn new(key: &'static str, url: String) -> Self {
        Self { key, url }
    }
}

/// The ordered set of resource requests needed to render one route.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    resources: Vec<ResourceSpec>,
}

impl FetchPlan {
    pub fn new(resources: Vec<ResourceSpec>) -> Self {
        Self { resources }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Joined results of a fully successful plan, decoded on demand. Partial
/// success never materializes as one of these.
#[derive(Debug)]
pub struct PlanData {
    values: HashMap<&'static str, Value>,
}

impl PlanData {
    pub fn decode<T: DeserializeOwned>(&self, key: &'static str) -> Result<T, TransportError> {
        let value = self
            .values
            .get(key)
            .ok_or(TransportError::MissingResource { key })?;
        serde_json::from_value(value.clone()).map_err(|source| TransportError::Shape { key, source })
    }
}

#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    pub fn user_url(&self, user_id: u64) -> String {
        format!("{}/users/{user_id}", self.base_url)
    }

    pub fn user_posts_url(&self, user_id: u64) -> String {
        format!("{}/users/{user_id}/posts", self.base_url)
    }

    pub fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    pub fn post_url(&self, post_id: u64) -> String {
        format!("{}/posts/{post_id}", self.base_url)
    }

    pub fn post_comments_url(&self, post_id: u64) -> String {
        format!("{}/posts/{post_id}/comments", self.base_url)
    }

    pub fn comment_url(&self, comment_id: u64) -> String {
        format!("{}/comments/{comment_id}", self.base_url)
    }

    /// Fire one GET per resource, await them all, and yield the joined data
    /// only when every request succeeded. On failure the error of the first
    /// failing resource in plan order is returned; sibling successes are
    /// discarded. No retry, no timeout, no cancellation of in-flight
    /// requests; a retry is a brand-new plan.
    pub async fn execute(&self, plan: &FetchPlan) -> Result<PlanData, TransportError> {
        debug!(resources = plan.len(), "executing fetch plan");
        let fetches = plan.resources.iter().map(|spec| async move {
            (spec.key, self.fetch_resource(spec).await)
        });
        let settled = join_all(fetches).await;

        let mut values = HashMap::with_capacity(settled.len());
        for (key, result) in settled {
            match result {
                Ok(value) => {
                    values.insert(key, value);
                }
                Err(err) => {
                    warn!(key, error = %err, "fetch plan collapsed");
                    return Err(err);
                }
            }
        }
        Ok(PlanData { values })
    }

    async fn fetch_resource(&self, spec: &ResourceSpec) -> Result<Value, TransportError> {
        let response = self
            .http
            .get(&spec.url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                key: spec.key,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                key: spec.key,
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| TransportError::Decode {
                key: spec.key,
                source,
            })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
