//! Daily log endpoints

use super::client::{ApiClient, RequestOptions};
use super::transport::{HttpTransport, Method};
use super::types::{CreateLogEntryRequest, CreateLogEntryResponse, TodayResponse};
use crate::error::ClientResult;
use crate::store::KeyValueStore;

impl<T: HttpTransport, S: KeyValueStore> ApiClient<T, S> {
    /// `GET /api/logs/today`
    pub async fn get_today(&self) -> ClientResult<TodayResponse> {
        self.request("/api/logs/today", RequestOptions::get()).await
    }

    /// `POST /api/logs/entries`
    pub async fn create_log_entry(&self, entry: &CreateLogEntryRequest) -> ClientResult<CreateLogEntryResponse> {
        let options = RequestOptions::method(Method::Post).json(entry)?;
        let created: CreateLogEntryResponse = self.request("/api/logs/entries", options).await?;
        tracing::info!(
            id = %created.id,
            meal = %entry.meal,
            quantity_g = entry.quantity_g,
            "Logged entry"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::MockTransport;
    use crate::api::{ApiClient, CreateLogEntryRequest, FoodSource, MealSlot};
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_today_decodes_dashboard() {
        let transport = MockTransport::new();
        transport.respond_json(
            200,
            json!({
                "date": "2026-10-16",
                "summary": {
                    "calorieGoal": 2000,
                    "caloriesConsumed": 450,
                    "macrosGoal": {"protein_g": 150, "carbs_g": 200, "fat_g": 70},
                    "macrosConsumed": {"protein_g": 30, "carbs_g": 50, "fat_g": 10}
                },
                "meals": [{
                    "meal": "breakfast",
                    "totals": {"calories": 450, "protein_g": 30, "carbs_g": 50, "fat_g": 10},
                    "entries": [{
                        "id": "e1",
                        "time": "08:10",
                        "food": {"name": "Oats", "source": "custom", "foodId": "f1"},
                        "quantity_g": 100,
                        "computed": {"calories": 450, "protein_g": 30, "carbs_g": 50, "fat_g": 10}
                    }]
                }],
                "recentFoods": []
            }),
        );
        let api = ApiClient::new(transport, MemoryStore::new(), "");

        let today = api.get_today().await.unwrap();
        assert_eq!(today.date, "2026-10-16");
        assert_eq!(today.summary.calories_consumed, 450.0);
        assert_eq!(today.meals[0].entries[0].food.food_id.as_deref(), Some("f1"));
    }

    #[tokio::test]
    async fn test_create_log_entry_body() {
        let transport = MockTransport::new();
        transport.respond_json(201, json!({"id": "e9"}));
        let api = ApiClient::new(transport.clone(), MemoryStore::new(), "");

        let created = api
            .create_log_entry(&CreateLogEntryRequest {
                meal: MealSlot::Dinner,
                source: FoodSource::Catalog,
                food_id: None,
                barcode: Some("737".to_string()),
                quantity_g: 150,
            })
            .await
            .unwrap();

        assert_eq!(created.id, "e9");
        let sent = transport.last_request();
        assert_eq!(sent.url, "/api/logs/entries");
        assert_eq!(
            sent.body.as_deref(),
            Some(r#"{"meal":"dinner","source":"off","barcode":"737","quantity_g":150}"#)
        );
    }
}
