//! Scaleway Kapsule HTTP client.
//!
//! Wraps the `k8s/v1` pools endpoints with the small result contract the
//! reconciler relies on: 404 on fetch means "not there" rather than failure,
//! and delete treats an already-gone pool as success. No retrying happens
//! here; retry policy belongs to callers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::domain::errors::{ReconcileError, ReconcileResult};
use crate::domain::models::{PoolPayload, PoolSnapshot};
use crate::domain::ports::PoolApi;

/// User-Agent sent on every request.
const USER_AGENT: &str = concat!("poolctl/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Kapsule pools API.
///
/// All methods return [`ReconcileResult`] and map transport, status, and
/// decode failures to the matching [`ReconcileError`] variants.
#[derive(Debug, Clone)]
pub struct ScalewayClient {
    /// The underlying HTTP client, carrying the per-request timeout.
    http: Client,
    /// Base URL of the control plane, without a trailing slash.
    api_url: String,
    /// Secret key sent as `X-Auth-Token`.
    token: String,
}

impl ScalewayClient {
    /// Create a new client against `api_url` with a bounded per-request
    /// timeout.
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        request_timeout: Duration,
    ) -> ReconcileResult<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ReconcileError::Configuration(format!("HTTP client init failed: {e}")))?;
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            api_url,
            token: token.into(),
        })
    }

    /// Collection URL for a cluster's pools.
    fn pools_url(&self, region: &str, cluster_id: &str) -> String {
        format!(
            "{}/k8s/v1/regions/{}/clusters/{}/pools",
            self.api_url, region, cluster_id
        )
    }

    /// Item URL for one pool.
    fn pool_url(&self, region: &str, cluster_id: &str, pool_id: &str) -> String {
        format!("{}/{}", self.pools_url(region, cluster_id), pool_id)
    }

    /// Build an authenticated request.
    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("X-Auth-Token", &self.token)
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
    }

    /// Send a request, mapping transport failures.
    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> ReconcileResult<reqwest::Response> {
        req.send().await.map_err(|e| ReconcileError::Request {
            operation,
            message: e.to_string(),
        })
    }

    /// Reject non-2xx responses, capturing the error body.
    async fn check_status(
        resp: reqwest::Response,
        operation: &'static str,
    ) -> ReconcileResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ReconcileError::Api {
            operation,
            status: status.as_u16(),
            body,
        })
    }

    /// Decode a 2xx body as JSON.
    async fn decode(resp: reqwest::Response, operation: &'static str) -> ReconcileResult<Value> {
        resp.json::<Value>()
            .await
            .map_err(|e| ReconcileError::Decode {
                operation,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl PoolApi for ScalewayClient {
    async fn list_pools(
        &self,
        region: &str,
        cluster_id: &str,
    ) -> ReconcileResult<Vec<PoolSnapshot>> {
        let url = self.pools_url(region, cluster_id);
        tracing::debug!(%url, "listing pools");

        let resp = self.send(self.request(Method::GET, &url), "list pools").await?;
        let resp = Self::check_status(resp, "list pools").await?;
        let body = Self::decode(resp, "list pools").await?;

        // The collection endpoint answers {"pools": [...]} but some
        // deployments return a bare array. Anything else means no pools.
        let items = match body {
            Value::Object(mut map) => match map.remove("pools") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        Ok(items.into_iter().map(PoolSnapshot::from_value).collect())
    }

    async fn get_pool(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<Option<PoolSnapshot>> {
        let url = self.pool_url(region, cluster_id, pool_id);
        tracing::debug!(%url, "fetching pool");

        let resp = self.send(self.request(Method::GET, &url), "get pool").await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check_status(resp, "get pool").await?;
        let body = Self::decode(resp, "get pool").await?;
        Ok(Some(PoolSnapshot::from_value(body)))
    }

    async fn create_pool(
        &self,
        region: &str,
        cluster_id: &str,
        payload: &PoolPayload,
    ) -> ReconcileResult<PoolSnapshot> {
        let url = self.pools_url(region, cluster_id);
        tracing::debug!(%url, pool = %payload.name, "creating pool");

        let resp = self
            .send(self.request(Method::POST, &url).json(payload), "create pool")
            .await?;
        let resp = Self::check_status(resp, "create pool").await?;
        let body = Self::decode(resp, "create pool").await?;
        Ok(PoolSnapshot::from_value(body))
    }

    async fn patch_pool(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
        payload: &PoolPayload,
    ) -> ReconcileResult<PoolSnapshot> {
        let url = self.pool_url(region, cluster_id, pool_id);
        tracing::debug!(%url, pool = %payload.name, "patching pool");

        let resp = self
            .send(self.request(Method::PATCH, &url).json(payload), "patch pool")
            .await?;
        let resp = Self::check_status(resp, "patch pool").await?;
        let body = Self::decode(resp, "patch pool").await?;
        Ok(PoolSnapshot::from_value(body))
    }

    async fn delete_pool(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<()> {
        let url = self.pool_url(region, cluster_id, pool_id);
        tracing::debug!(%url, "deleting pool");

        let resp = self.send(self.request(Method::DELETE, &url), "delete pool").await?;
        // Already gone counts as deleted.
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check_status(resp, "delete pool").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_the_kapsule_layout() {
        let client =
            ScalewayClient::new("https://api.example.com", "tok", Duration::from_secs(30))
                .unwrap();
        assert_eq!(
            client.pools_url("fr-par", "c1"),
            "https://api.example.com/k8s/v1/regions/fr-par/clusters/c1/pools"
        );
        assert_eq!(
            client.pool_url("fr-par", "c1", "p1"),
            "https://api.example.com/k8s/v1/regions/fr-par/clusters/c1/pools/p1"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client =
            ScalewayClient::new("https://api.example.com/", "tok", Duration::from_secs(30))
                .unwrap();
        assert_eq!(
            client.pools_url("nl-ams", "c2"),
            "https://api.example.com/k8s/v1/regions/nl-ams/clusters/c2/pools"
        );
    }

    #[test]
    fn test_user_agent_carries_crate_version() {
        assert!(USER_AGENT.starts_with("poolctl/"));
        assert!(USER_AGENT.len() > "poolctl/".len());
    }
}
