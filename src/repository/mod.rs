use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use std::{future::Future, time::Duration};

use crate::{
    dto::{ErrorResponse, ResultResponse},
    models::Note,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to reach notes store: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Notes store responded with {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Remote note store. The store is authoritative for ids and content; callers
/// only ever hold a cache of it.
pub trait NotesApi: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = Result<Vec<Note>, ApiError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Note, ApiError>> + Send;

    fn create(&self, note: &Note) -> impl Future<Output = Result<Note, ApiError>> + Send;

    fn update(
        &self,
        id: i64,
        note: &Note,
    ) -> impl Future<Output = Result<ResultResponse, ApiError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<ResultResponse, ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpNotesApi {
    base_url: String,
    client: Client,
}

impl HttpNotesApi {
    /// `base_url` is the notes collection itself, e.g. `http://host/notes` or
    /// `http://host/api/notes`. Without a timeout only the transport's own limits apply.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn note_url(&self, id: i64) -> String {
        format!("{}/{id}", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!("Sending {} request to {}", method, url);
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(
            "Notes store response status: {}, size: {} bytes",
            status,
            body.len()
        );

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body).map_or_else(
                |_| String::from_utf8_lossy(&body).into_owned(),
                |e| e.error,
            );
            return Err(ApiError::Status { status, message });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

impl NotesApi for HttpNotesApi {
    async fn list(&self) -> Result<Vec<Note>, ApiError> {
        Self::send(self.request(Method::GET, &self.base_url)).await
    }

    async fn get(&self, id: i64) -> Result<Note, ApiError> {
        Self::send(self.request(Method::GET, &self.note_url(id))).await
    }

    async fn create(&self, note: &Note) -> Result<Note, ApiError> {
        Self::send(self.request(Method::POST, &self.base_url).json(note)).await
    }

    async fn update(&self, id: i64, note: &Note) -> Result<ResultResponse, ApiError> {
        Self::send(self.request(Method::PUT, &self.note_url(id)).json(note)).await
    }

    async fn delete(&self, id: i64) -> Result<ResultResponse, ApiError> {
        Self::send(self.request(Method::DELETE, &self.note_url(id))).await
    }
}
