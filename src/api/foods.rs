//! Food lookup endpoints

use super::client::{ApiClient, RequestOptions};
use super::transport::{HttpTransport, Method};
use super::types::{CreateCustomFoodRequest, FoodEnvelope, FoodRecord, FoodSearchPage};
use crate::error::{ClientError, ClientResult};
use crate::store::KeyValueStore;

/// Page size used when the caller has no preference
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

impl<T: HttpTransport, S: KeyValueStore> ApiClient<T, S> {
    /// `GET /api/foods/search?q=&limit=&cursor=`
    pub async fn search_foods(
        &self,
        query: &str,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> ClientResult<FoodSearchPage> {
        let mut path = format!(
            "/api/foods/search?q={}&limit={}",
            urlencoding::encode(query),
            limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
        );
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            path.push_str("&cursor=");
            path.push_str(&urlencoding::encode(cursor));
        }

        self.request(&path, RequestOptions::get()).await
    }

    /// `GET /api/foods/barcode/{code}`
    pub async fn get_food_by_barcode(&self, code: &str) -> ClientResult<FoodRecord> {
        let path = format!("/api/foods/barcode/{}", urlencoding::encode(code.trim()));
        let envelope: FoodEnvelope = self.request(&path, RequestOptions::get()).await?;
        envelope
            .into_item()
            .ok_or_else(|| ClientError::NotFound("Not found".to_string()))
    }

    /// `POST /api/foods/custom`
    pub async fn create_custom_food(&self, request: &CreateCustomFoodRequest) -> ClientResult<FoodRecord> {
        let options = RequestOptions::method(Method::Post).json(request)?;
        let envelope: FoodEnvelope = self.request("/api/foods/custom", options).await?;
        let food = envelope
            .into_item()
            .ok_or_else(|| ClientError::NotFound("Create failed".to_string()))?;
        tracing::info!(id = %food.id, name = %food.name, "Created custom food");
        Ok(food)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::MockTransport;
    use crate::api::{ApiClient, CreateCustomFoodRequest, FoodSource};
    use crate::error::ClientError;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn api(transport: &MockTransport) -> ApiClient<MockTransport, MemoryStore> {
        ApiClient::new(transport.clone(), MemoryStore::new(), "")
    }

    #[tokio::test]
    async fn test_search_encodes_query_and_defaults_limit() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"items": [], "nextCursor": null}));

        api(&transport).search_foods("greek yogurt & honey", None, None).await.unwrap();

        assert_eq!(
            transport.last_request().url,
            "/api/foods/search?q=greek%20yogurt%20%26%20honey&limit=20"
        );
    }

    #[tokio::test]
    async fn test_search_passes_cursor() {
        let transport = MockTransport::new();
        transport.respond_json(
            200,
            json!({"items": [{"id": "1", "source": "off", "name": "Oats", "barcode": "1"}], "nextCursor": "p2"}),
        );

        let page = api(&transport)
            .search_foods("oats", Some(25), Some("p1"))
            .await
            .unwrap();

        assert_eq!(transport.last_request().url, "/api/foods/search?q=oats&limit=25&cursor=p1");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn test_barcode_wrapped_and_bare() {
        let transport = MockTransport::new();
        transport
            .respond_json(200, json!({"item": {"id": "737", "source": "off", "name": "Skyr", "barcode": "737"}}))
            .respond_json(200, json!({"id": "737", "source": "off", "name": "Skyr", "barcode": "737"}));
        let api = api(&transport);

        let wrapped = api.get_food_by_barcode("737").await.unwrap();
        let bare = api.get_food_by_barcode("737").await.unwrap();

        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.source, FoodSource::Catalog);
        assert_eq!(transport.last_request().url, "/api/foods/barcode/737");
    }

    #[tokio::test]
    async fn test_barcode_null_item_is_not_found() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"item": null}));

        let err = api(&transport).get_food_by_barcode("000").await.unwrap_err();

        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found");
    }

    #[tokio::test]
    async fn test_barcode_path_segment_is_encoded() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"item": null}));

        let _ = api(&transport).get_food_by_barcode("12/34").await;
        assert_eq!(transport.last_request().url, "/api/foods/barcode/12%2F34");
    }

    #[tokio::test]
    async fn test_create_custom_food() {
        let transport = MockTransport::new();
        transport.respond_json(201, json!({"item": {"id": "c1", "source": "custom", "name": "Protein bar"}}));

        let request = CreateCustomFoodRequest {
            name: "Protein bar".to_string(),
            kcal_per_100g: 380.0,
            ..Default::default()
        };
        let food = api(&transport).create_custom_food(&request).await.unwrap();

        assert_eq!(food.id, "c1");
        assert_eq!(food.source, FoodSource::Custom);
        let body: serde_json::Value =
            serde_json::from_str(transport.last_request().body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Protein bar");
        assert_eq!(body["kcalPer100g"], 380.0);
    }

    #[tokio::test]
    async fn test_create_custom_food_null_item() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"item": null}));

        let err = api(&transport)
            .create_custom_food(&CreateCustomFoodRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Create failed");
    }
}
