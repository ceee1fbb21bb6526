use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::EndpointError;

/// Source of homework statuses
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    /// Fetch the raw review payload for homeworks updated since `from_date`
    async fn fetch(&self, from_date: i64) -> Result<Value, EndpointError>;
}

/// Client for the Practicum homework statuses endpoint
#[derive(Clone)]
pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: SecretString,
}

impl PracticumClient {
    pub fn new(client: Client, endpoint: impl Into<String>, token: SecretString) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token,
        }
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    #[instrument(name = "Fetching homework statuses", skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, from_date: i64) -> Result<Value, EndpointError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(
                AUTHORIZATION,
                format!("OAuth {}", self.token.expose_secret()),
            )
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|source| EndpointError::Unreachable {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Status {
                endpoint: self.endpoint.clone(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| EndpointError::Unreachable {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        let payload =
            serde_json::from_slice(&body).map_err(|source| EndpointError::InvalidBody {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        debug!("Received homework statuses");
        Ok(payload)
    }
}
