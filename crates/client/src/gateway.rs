//! HTTP gateway for the todo API
//!
//! Each call performs one request and returns the unwrapped `data` payload.
//! Every failure, including transport and decode errors, comes back as a
//! [`ClientError`].

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use todo_core::envelope::{DataEnvelope, ErrorEnvelope};
use todo_core::todo::{Todo, TodoPatch};

use crate::error::{ClientError, Result};

/// The four operations the list controller needs
#[async_trait]
pub trait TodoGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>>;

    async fn create(&self, title: &str) -> Result<Todo>;

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[derive(Serialize)]
struct CreateTodoRequest<'a> {
    title: &'a str,
}

/// [`TodoGateway`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpTodoClient {
    client: Client,
    base_url: String,
}

impl HttpTodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            // The API is usually local; skip any system proxy
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/api/todos/{}", self.base_url, urlencoding::encode(id))
    }
}

#[async_trait]
impl TodoGateway for HttpTodoClient {
    async fn list(&self) -> Result<Vec<Todo>> {
        debug!("GET {}", self.collection_url());
        let res = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(network)?;
        unwrap_data(res).await
    }

    async fn create(&self, title: &str) -> Result<Todo> {
        debug!("POST {}", self.collection_url());
        let res = self
            .client
            .post(self.collection_url())
            .json(&CreateTodoRequest { title })
            .send()
            .await
            .map_err(network)?;
        unwrap_data(res).await
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo> {
        debug!("PATCH {}", self.item_url(id));
        let res = self
            .client
            .patch(self.item_url(id))
            .json(patch)
            .send()
            .await
            .map_err(network)?;
        unwrap_data(res).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        debug!("DELETE {}", self.item_url(id));
        let res = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(network)?;
        if !res.status().is_success() {
            return Err(to_error(res).await);
        }
        Ok(())
    }
}

fn network(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

async fn unwrap_data<T: DeserializeOwned>(res: Response) -> Result<T> {
    if !res.status().is_success() {
        return Err(to_error(res).await);
    }
    let bytes = res.bytes().await.map_err(network)?;
    let envelope: DataEnvelope<T> =
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

async fn to_error(res: Response) -> ClientError {
    let status = res.status();
    // An unreadable body is treated the same as a missing envelope
    let body = res.bytes().await.unwrap_or_default();
    error_from_parts(status, &body)
}

/// Build the error for a non-success response from its status and raw body
pub fn error_from_parts(status: StatusCode, body: &[u8]) -> ClientError {
    let base = format!(
        "Request failed: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_string();

    let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) else {
        return ClientError::Api {
            status: status.as_u16(),
            code: None,
            message: base,
        };
    };

    let details = envelope
        .details
        .as_deref()
        .filter(|details| envelope.is_validation() && !details.is_empty())
        .map(|details| {
            details
                .iter()
                .map(|d| {
                    if d.path.is_empty() {
                        d.message.clone()
                    } else {
                        format!("{}: {}", d.path, d.message)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        });

    let message = match details {
        Some(details) => format!("{base} ({}): {details}", envelope.error),
        None => format!("{base} ({})", envelope.error),
    };

    ClientError::Api {
        status: status.as_u16(),
        code: Some(envelope.error),
        message,
    }
}
