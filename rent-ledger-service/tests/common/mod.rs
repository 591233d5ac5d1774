#![allow(dead_code)]

use async_trait::async_trait;
use rent_ledger_service::config::{LedgerConfig, MongoConfig, StoreBackend, StoreConfig};
use rent_ledger_service::models::{BillingRecord, Month, NewBillingRecord, RecordUpdate};
use rent_ledger_service::services::{init_metrics, InMemoryLedgerStore, LedgerStore, StoreError};
use rent_ledger_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn LedgerStore>,
    pub client: reqwest::Client,
}

pub fn test_config() -> LedgerConfig {
    LedgerConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            log_level: "info".to_string(),
        },
        mongodb: MongoConfig {
            uri: None,
            database: "rent_softs".to_string(),
            collection: "rent".to_string(),
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
        },
        otlp_endpoint: None,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(InMemoryLedgerStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn LedgerStore>) -> Self {
        init_metrics();

        let app = Application::build_with_store(test_config(), store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_record(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/records"))
            .json(body)
            .send()
            .await
            .expect("Failed to send create request")
    }

    /// Creates a record and returns its id, failing the test on any error.
    pub async fn seed(&self, body: Value) -> String {
        let response = self.create_record(&body).await;
        assert_eq!(response.status().as_u16(), 201, "seeding {} failed", body);
        let created: Value = response.json().await.expect("Invalid create response");
        created["id"]
            .as_str()
            .expect("Created record has no id")
            .to_string()
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

/// Store whose backend is always unreachable.
pub struct UnreachableLedgerStore;

impl UnreachableLedgerStore {
    fn error() -> StoreError {
        StoreError::Unavailable("connection refused".to_string())
    }
}

#[async_trait]
impl LedgerStore for UnreachableLedgerStore {
    async fn find_by_month(
        &self,
        _month: Month,
        _city_pattern: Option<&str>,
    ) -> Result<Vec<BillingRecord>, StoreError> {
        Err(Self::error())
    }

    async fn search_by_name_or_property(
        &self,
        _text: &str,
    ) -> Result<Vec<BillingRecord>, StoreError> {
        Err(Self::error())
    }

    async fn get(&self, _id: &str) -> Result<Option<BillingRecord>, StoreError> {
        Err(Self::error())
    }

    async fn insert(&self, _record: NewBillingRecord) -> Result<String, StoreError> {
        Err(Self::error())
    }

    async fn update_fields(&self, _id: &str, _update: RecordUpdate) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

pub fn record(
    city: &str,
    property: &str,
    tenant: &str,
    month: &str,
    category: &str,
    billed: f64,
    paid: f64,
) -> Value {
    json!({
        "city": city,
        "property_name": property,
        "unit": "A-101",
        "tenant_name": tenant,
        "month": month,
        "category": category,
        "billed_amount": billed,
        "paid_amount": paid,
        "notes": ""
    })
}
