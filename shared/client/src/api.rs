//! Transport between the form stores and the record endpoints.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use flexiflo_models::{DocumentKind, Envelope, FieldError, Record};

/// A request that did not produce a successful envelope.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiFailure {
    /// The server answered with a non-success status.
    #[error("request rejected with status {status}")]
    Rejected {
        status: u16,
        envelope: Envelope<Value>,
    },

    /// The server could not be reached or the body was unreadable.
    #[error("network error: {message}")]
    Network { message: String },
}

impl ApiFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }

    /// Server message, when there was one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected { envelope, .. } => envelope.message.as_deref(),
            Self::Network { .. } => None,
        }
    }

    /// Structured field errors of a 400 response.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Rejected {
                status: 400,
                envelope,
            } => envelope.errors.as_deref().unwrap_or(&[]),
            _ => &[],
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(error: reqwest::Error) -> Self {
        Self::Network {
            message: error.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<Envelope<T>, ApiFailure>;

/// Operations on one record collection.
#[async_trait]
pub trait ResourceApi<K: DocumentKind>: Send + Sync {
    async fn create(&self, document: &Value) -> ApiResult<Record<K>>;

    async fn list(&self) -> ApiResult<Vec<Record<K>>>;

    async fn get(&self, id: &str) -> ApiResult<Record<K>>;

    async fn update(&self, id: &str, document: &Value) -> ApiResult<Record<K>>;

    async fn delete(&self, id: &str) -> ApiResult<K::Summary>;
}

/// [`ResourceApi`] over HTTP.
pub struct HttpResourceApi<K> {
    client: Client,
    collection_url: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K: DocumentKind> HttpResourceApi<K> {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ApiFailure> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            collection_url: format!("{}/api/{}", base_url.trim_end_matches('/'), K::RESOURCE),
            _kind: PhantomData,
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let envelope = match response.json::<Envelope<Value>>().await {
        Ok(envelope) => envelope,
        Err(error) => {
            tracing::debug!(%status, error = %error, "Rejection without envelope");
            Envelope::failure(status.canonical_reason().unwrap_or("Request failed"))
        }
    };
    Err(ApiFailure::Rejected {
        status: status.as_u16(),
        envelope,
    })
}

#[async_trait]
impl<K: DocumentKind> ResourceApi<K> for HttpResourceApi<K> {
    async fn create(&self, document: &Value) -> ApiResult<Record<K>> {
        let response = self
            .client
            .post(format!("{}/create", self.collection_url))
            .json(document)
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn list(&self) -> ApiResult<Vec<Record<K>>> {
        let response = self
            .client
            .get(format!("{}/list", self.collection_url))
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn get(&self, id: &str) -> ApiResult<Record<K>> {
        let response = self.client.get(self.record_url(id)).send().await?;
        read_envelope(response).await
    }

    async fn update(&self, id: &str, document: &Value) -> ApiResult<Record<K>> {
        let response = self
            .client
            .put(self.record_url(id))
            .json(document)
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn delete(&self, id: &str) -> ApiResult<K::Summary> {
        let response = self.client.delete(self.record_url(id)).send().await?;
        read_envelope(response).await
    }
}
