//! Account endpoints

use super::client::{ApiClient, RequestOptions};
use super::transport::{HttpTransport, Method};
use super::types::{Credentials, LoginResponse, MeResponse};
use crate::error::ClientResult;
use crate::forms::AuthMode;
use crate::store::KeyValueStore;

impl<T: HttpTransport, S: KeyValueStore> ApiClient<T, S> {
    /// `POST /api/auth/register`. Does not log in.
    pub async fn register(&self, username: &str, password: &str) -> ClientResult<()> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let options = RequestOptions::method(Method::Post).json(&body)?;
        let _: serde_json::Value = self.request("/api/auth/register", options).await?;
        tracing::info!(username, "Registered account");
        Ok(())
    }

    /// `POST /api/auth/login` and persist the returned token
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let options = RequestOptions::method(Method::Post).json(&body)?;
        let response: LoginResponse = self.request("/api/auth/login", options).await?;
        self.tokens().set(&response.token)?;
        tracing::info!(username, "Logged in");
        Ok(())
    }

    /// Forget the stored token. No server call.
    pub fn logout(&self) -> ClientResult<()> {
        self.tokens().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Register first when `mode` asks for it, then log in
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        username: &str,
        password: &str,
    ) -> ClientResult<()> {
        if mode == AuthMode::Register {
            self.register(username, password).await?;
        }
        self.login(username, password).await
    }

    /// `GET /api/me`
    pub async fn me(&self) -> ClientResult<MeResponse> {
        self.request("/api/me", RequestOptions::get()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::MockTransport;
    use crate::api::{ApiClient, Method};
    use crate::forms::AuthMode;
    use crate::store::{KeyValueStore, MemoryStore, TOKEN_KEY};
    use serde_json::json;

    #[tokio::test]
    async fn test_login_persists_token_and_next_request_is_authorized() {
        let transport = MockTransport::new();
        transport
            .respond_json(200, json!({"token": "abc"}))
            .respond_json(200, json!({"id": "u1", "username": "ana"}));
        let store = MemoryStore::new();
        let api = ApiClient::new(transport.clone(), store.clone(), "");

        api.login("ana", "pw").await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("abc"));

        let me = api.me().await.unwrap();
        assert_eq!(me.username, "ana");

        let requests = transport.requests();
        assert_eq!(requests[0].url, "/api/auth/login");
        assert_eq!(requests[0].header("Authorization"), None);
        assert_eq!(
            requests[0].body.as_deref(),
            Some(r#"{"username":"ana","password":"pw"}"#)
        );
        assert_eq!(requests[1].url, "/api/me");
        assert_eq!(requests[1].header("Authorization"), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_token() {
        let transport = MockTransport::new();
        transport.respond_json(401, json!({"error": {"message": "invalid credentials"}}));
        let store = MemoryStore::with(TOKEN_KEY, "old");
        let api = ApiClient::new(transport, store.clone(), "");

        let err = api.login("ana", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "invalid credentials");
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_register_mode_registers_then_logs_in() {
        let transport = MockTransport::new();
        transport
            .respond(201, "")
            .respond_json(200, json!({"token": "fresh"}));
        let store = MemoryStore::new();
        let api = ApiClient::new(transport.clone(), store.clone(), "");

        api.authenticate(AuthMode::Register, "ana", "pw").await.unwrap();

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["/api/auth/register", "/api/auth/login"]);
        assert!(transport.requests().iter().all(|r| r.method == Method::Post));
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_register_failure_skips_login() {
        let transport = MockTransport::new();
        transport.respond_json(409, json!({"error": {"message": "username taken"}}));
        let api = ApiClient::new(transport.clone(), MemoryStore::new(), "");

        let err = api
            .authenticate(AuthMode::Register, "ana", "pw")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "username taken");
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_logout_clears_token() {
        let store = MemoryStore::with(TOKEN_KEY, "abc");
        let api = ApiClient::new(MockTransport::new(), store.clone(), "");
        api.logout().unwrap();
        assert_eq!(store.get(TOKEN_KEY), None);
    }

    struct ReadOnlyStore;

    impl crate::store::KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            Some("abc".to_string())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), crate::store::StoreError> {
            Err(crate::store::StoreError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), crate::store::StoreError> {
            Err(crate::store::StoreError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_logout_reports_store_failure() {
        let api = ApiClient::new(MockTransport::new(), ReadOnlyStore, "");

        let err = api.logout().unwrap_err();
        assert!(matches!(err, crate::ClientError::Store(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
