//! MacroFacts REST API
//!
//! [`ApiClient`] wraps a transport and a token store. Endpoint methods live in
//! one file per resource:
//!
//! - `auth` - register, login, logout, `/me`
//! - `me` - settings and timezone sync
//! - `foods` - search, barcode lookup, custom foods
//! - `logs` - today's dashboard and new entries

mod auth;
pub mod client;
mod foods;
mod logs;
mod me;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{error_from_response, ApiClient, RequestOptions};
pub use foods::DEFAULT_SEARCH_LIMIT;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
pub use types::*;

#[cfg(feature = "native")]
pub use transport::ReqwestTransport;
