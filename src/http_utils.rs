use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::controller::Envelope;

/// Errors from talking to a bookshelf server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response, or the response body was unreadable.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The server answered with a failure envelope.
    #[error("{}", api_message(.error, .message))]
    Api {
        status: StatusCode,
        error: String,
        message: Option<String>,
    },
}

fn api_message(error: &str, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{error}: {message}"),
        None => error.to_string(),
    }
}

impl ClientError {
    /// The HTTP status, when the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }
}

/// HTTP client for the bookshelf API that unwraps response envelopes.
pub struct BookshelfClient {
    client: Client,
    base_url: String,
}

impl BookshelfClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Constructs a full URL from a path
    pub fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }

    /// Makes a GET request and returns the envelope's data
    pub async fn get<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.client.get(self.url(path)).send().await?;
        unwrap_envelope(response).await
    }

    /// Makes a POST request with JSON body and returns the envelope's data
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        unwrap_envelope(response).await
    }

    /// Makes a PUT request with JSON body and returns the envelope's data
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        unwrap_envelope(response).await
    }

    /// Makes a DELETE request; success has no body
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.client.delete(self.url(path)).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(response).await)
        }
    }
}

async fn unwrap_envelope<T>(response: Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    if !response.status().is_success() {
        return Err(failure(response).await);
    }
    let status = response.status();
    let envelope: Envelope<T> = response.json().await?;
    envelope.data.ok_or_else(|| ClientError::Api {
        status,
        error: "Response carried no data".to_string(),
        message: envelope.error,
    })
}

async fn failure(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<Envelope<serde_json::Value>>(&text) {
        Ok(Envelope {
            error: Some(error),
            message,
            ..
        }) => ClientError::Api {
            status,
            error,
            message,
        },
        _ => ClientError::Api {
            status,
            error: status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            message: (!text.is_empty()).then_some(text),
        },
    }
}
