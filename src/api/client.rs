//! JSON API Client
//!
//! Every endpoint goes through [`ApiClient::request`], which owns the header
//! rules and the error envelope handling:
//!
//! - `Content-Type: application/json` is added when there is a body and the
//!   caller set no content type
//! - `Authorization: Bearer <token>` is added when a token is stored and the
//!   caller set no authorization
//! - non-2xx bodies are read as `{ "error": { "message", "code", ... } }`,
//!   falling back to `Request failed (<status>)`

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::transport::{HttpRequest, HttpTransport, Method};
use super::types::ErrorEnvelope;
use crate::error::{ClientError, ClientResult};
use crate::store::KeyValueStore;
use crate::token::TokenStore;

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        let encoded = serde_json::to_string(body)
            .map_err(|e| ClientError::validation(format!("Failed to encode request: {}", e)))?;
        self.body = Some(encoded);
        Ok(self)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// MacroFacts REST client
#[derive(Debug, Clone)]
pub struct ApiClient<T, S> {
    transport: T,
    tokens: TokenStore<S>,
    base_url: String,
}

impl<T: HttpTransport, S: KeyValueStore> ApiClient<T, S> {
    /// `base_url` is prepended to `/api/...` paths; empty means same origin
    pub fn new(transport: T, store: S, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            tokens: TokenStore::new(store),
            base_url,
        }
    }

    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and decode the JSON response
    pub async fn request<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<R> {
        let request = self.prepare(path, options);
        let method = request.method;

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::debug!(%method, path, error = %e, "Request failed to send");
            ClientError::Network(e.to_string())
        })?;

        tracing::debug!(%method, path, status = response.status, "API response");

        if !response.is_success() {
            return Err(error_from_response(response.status, &response.body));
        }

        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };

        serde_json::from_str(body).map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Response did not match expected shape");
            ClientError::Decode(e.to_string())
        })
    }

    fn prepare(&self, path: &str, mut options: RequestOptions) -> HttpRequest {
        if options.body.is_some() && !options.has_header("Content-Type") {
            options
                .headers
                .push(("Content-Type".to_string(), "application/json".to_string()));
        }

        if !options.has_header("Authorization") {
            if let Some(token) = self.tokens.get() {
                options
                    .headers
                    .push(("Authorization".to_string(), format!("Bearer {}", token)));
            }
        }

        HttpRequest {
            method: options.method,
            url: self.url(path),
            headers: options.headers,
            body: options.body,
        }
    }
}

/// Map a non-2xx response to a structured error
pub fn error_from_response(status: u16, body: &str) -> ClientError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let error = envelope.error.unwrap_or_default();

    let message = error
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed ({})", status));

    ClientError::Api {
        status,
        message,
        code: error.code.filter(|c| !c.is_empty()),
        request_id: error.request_id.filter(|r| !r.is_empty()),
        details: error.details,
    }
}
