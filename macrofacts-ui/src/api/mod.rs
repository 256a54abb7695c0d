//! Browser Bindings
//!
//! `fetch` transport (gloo-net) and `localStorage` slots for the shared
//! MacroFacts client.

use async_trait::async_trait;
use gloo_net::http::{Method as FetchMethod, RequestBuilder};
use macrofacts::{
    ApiClient, HttpRequest, HttpResponse, HttpTransport, KeyValueStore, Method, StoreError,
    TransportError,
};

/// Same origin; the dev server proxies `/api`
pub const DEFAULT_API_BASE: &str = "";

const API_BASE_KEY: &str = "macrofacts_api_url";

pub type Client = ApiClient<GlooTransport, LocalStorageStore>;

/// Client bound to the configured API base and browser storage
pub fn client() -> Client {
    ApiClient::new(GlooTransport, LocalStorageStore, get_api_base())
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    LocalStorageStore
        .get(API_BASE_KEY)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// `fetch` via gloo-net
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => FetchMethod::GET,
            Method::Post => FetchMethod::POST,
            Method::Patch => FetchMethod::PATCH,
            Method::Put => FetchMethod::PUT,
            Method::Delete => FetchMethod::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let sent = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| TransportError(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response = sent.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("Failed to read body: {}", e)))?;

        Ok(HttpResponse::new(status, body))
    }
}

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

/// Log through the browser console
pub fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}
