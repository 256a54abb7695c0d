//! HTTP Transport
//!
//! The API client speaks to the network through [`HttpTransport`] so the same
//! request logic runs on reqwest (native), `fetch` (browser) and in-memory
//! fakes (tests).

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully prepared request: absolute URL, final headers, serialized body
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status and body text
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request produced no HTTP response
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends one request. No retries, no caching.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "native")]
pub use native::ReqwestTransport;

#[cfg(feature = "native")]
mod native {
    use super::*;
    use std::time::Duration;

    /// reqwest-backed transport
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Duration) -> Result<Self, TransportError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("macrofacts/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| TransportError(format!("Failed to create HTTP client: {}", e)))?;
            Ok(Self { client })
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Patch => reqwest::Method::PATCH,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    TransportError("Request timeout".to_string())
                } else if e.is_connect() {
                    TransportError(format!("Cannot connect to {}", request.url))
                } else {
                    TransportError(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError(format!("Failed to read body: {}", e)))?;

            Ok(HttpResponse { status, body })
        }
    }
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use std::time::Duration;

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route(
                "/api/echo-auth",
                get(|headers: HeaderMap| async move {
                    headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none")
                        .to_string()
                }),
            )
            .route(
                "/api/echo",
                post(|Json(body): Json<serde_json::Value>| async move { Json(body) }),
            )
            .route(
                "/api/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest {
            method: Method::Get,
            url: "/api/me".to_string(),
            headers: vec![("authorization".to_string(), "Bearer x".to_string())],
            body: None,
        };
        assert_eq!(request.header("Authorization"), Some("Bearer x"));
        assert_eq!(request.header("Content-Type"), None);
    }

    #[tokio::test]
    async fn test_reqwest_transport_sends_headers_and_body() {
        let base = spawn_stub().await;
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

        let response = transport
            .send(HttpRequest {
                method: Method::Get,
                url: format!("{}/api/echo-auth", base),
                headers: vec![("Authorization".to_string(), "Bearer abc".to_string())],
                body: None,
            })
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "Bearer abc");

        let response = transport
            .send(HttpRequest {
                method: Method::Post,
                url: format!("{}/api/echo", base),
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: Some(r#"{"q":"skyr"}"#.to_string()),
            })
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, r#"{"q":"skyr"}"#);
    }

    #[tokio::test]
    async fn test_reqwest_transport_reports_status() {
        let base = spawn_stub().await;
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

        let response = transport
            .send(HttpRequest {
                method: Method::Get,
                url: format!("{}/api/broken", base),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let result = transport
            .send(HttpRequest {
                method: Method::Get,
                url: format!("http://{}/api/me", addr),
                headers: Vec::new(),
                body: None,
            })
            .await;

        assert!(result.is_err());
    }
}
