//! Shared HTTP plumbing for every collection.

use crate::auth::{Authenticator, Registrar};
use crate::lookups::LookupClient;
use crate::resource_client::ResourceClient;
use crate::{ClientError, ClientResult};
use eco_config_and_utils::Config;
use eco_types::{Lookup, Resource};
use serde::de::DeserializeOwned;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use url::Url;

pub(crate) fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Entry point to the remote API. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client with no request timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client from configuration (base URL and optional timeout).
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let base_url = config
            .api_base_url()
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// `{base}/Controller{collection}`
    pub(crate) fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/Controller{}",
            self.base_url.as_str().trim_end_matches('/'),
            collection
        )
    }

    pub fn resource<T: Resource>(&self) -> ResourceClient<T> {
        ResourceClient::new(self.clone())
    }

    pub fn lookup<L: Lookup>(&self) -> LookupClient<L> {
        LookupClient::new(self.clone())
    }

    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(self.clone())
    }

    pub fn registrar(&self) -> Registrar {
        Registrar::new(self.clone())
    }

    /// GET a whole collection and decode it as a JSON array.
    ///
    /// `label` names the collection in errors and logs.
    pub async fn list_collection<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        label: &'static str,
    ) -> ClientResult<Vec<T>> {
        let url = self.collection_url(collection);
        tracing::debug!("Fetching {} from {}", label, url);

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::fetch(label, e))?;

        let response = ensure_success(response, "Failed to fetch collection")
            .await
            .map_err(|reason| ClientError::fetch(label, reason))?;

        let items: Vec<T> = response
            .json()
            .await
            .map_err(|e| ClientError::fetch(label, e))?;
        tracing::debug!("Fetched {} {}", items.len(), label);
        Ok(items)
    }
}

/// Pass a 2xx response through; otherwise log a body summary and return
/// the reason string.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    context: &'static str,
) -> Result<reqwest::Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body_summary = summarize_response_body(&body);
    tracing::error!(status = %status, body_summary = %body_summary, "{}", context);
    Err(format!("HTTP {} ({})", status, body_summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_joins_base_and_collection() {
        let client = ApiClient::new(Url::parse("https://ecodelicias.somee.com/api").unwrap());
        assert_eq!(
            client.collection_url("Recipes"),
            "https://ecodelicias.somee.com/api/ControllerRecipes"
        );

        let trailing = ApiClient::new(Url::parse("http://localhost:5000/api/").unwrap());
        assert_eq!(
            trailing.collection_url("User"),
            "http://localhost:5000/api/ControllerUser"
        );
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            ApiClient::from_config(&config),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn body_summary_hides_content() {
        let summary = summarize_response_body("secret token");
        assert!(summary.starts_with("len=12,digest="));
        assert!(!summary.contains("secret"));
    }
}
