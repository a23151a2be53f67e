//! Bearer-token JSON client for the government REST APIs.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::GovApiConfig;
use crate::error::{HrmsError, HrmsResult};

/// A client for one government service (QIWA or SINAD).
///
/// Calls are made once; there is no retry. Transport failures, non-2xx
/// statuses and undecodable bodies all surface as
/// [`HrmsError::ExternalService`].
#[derive(Debug, Clone)]
pub struct GovApiClient {
    client: Client,
    service: &'static str,
    base_url: String,
    api_token: Option<String>,
}

impl GovApiClient {
    /// Builds a client for `service` from its configuration.
    pub fn new(service: &'static str, config: &GovApiConfig) -> HrmsResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HrmsError::ExternalService {
                service,
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            service,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// The service name used in errors and logs.
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// The base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GETs `path` and decodes the JSON response.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> HrmsResult<R> {
        let url = self.url(path);
        debug!(service = self.service, url = %url, "GET");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| self.failure(e))?;
        self.decode(response).await
    }

    /// POSTs `body` as JSON to `path` and decodes the JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> HrmsResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(service = self.service, url = %url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| self.failure(e))?;
        self.decode(response).await
    }

    async fn decode<R: DeserializeOwned>(&self, response: Response) -> HrmsResult<R> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(HrmsError::ExternalService {
                service: self.service,
                message: format!("API error {status}: {error_text}"),
            });
        }

        response.json().await.map_err(|e| HrmsError::ExternalService {
            service: self.service,
            message: format!("failed to parse response: {e}"),
        })
    }

    fn failure(&self, error: reqwest::Error) -> HrmsError {
        HrmsError::ExternalService {
            service: self.service,
            message: format!("request failed: {error}"),
        }
    }
}
