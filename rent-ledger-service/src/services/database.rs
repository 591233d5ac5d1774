use crate::models::{BillingRecord, Month, NewBillingRecord, RecordUpdate};
use crate::services::store::{
    non_blank, validate_new_record, validate_update, LedgerStore, StoreError,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    error::{Error as MongoError, ErrorKind},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use rust_decimal::prelude::ToPrimitive;
use service_core::error::AppError;

impl From<MongoError> for StoreError {
    fn from(err: MongoError) -> Self {
        match *err.kind {
            ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                StoreError::Decode(err.to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// Case-insensitive "contains" filter with the user's text escaped, so
/// characters like `(` or `.` match literally.
fn contains_filter(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

/// Matches string ids as well as ObjectId keys of older documents.
fn id_filter(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "$or": [ { "_id": id }, { "_id": oid } ] },
        Err(_) => doc! { "_id": id },
    }
}

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::ServiceUnavailable(anyhow::Error::new(e))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self {
            client,
            db,
            collection: collection.to_string(),
        })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for rent-ledger-service");

        let records = self.records();

        let month_index = IndexModel::builder()
            .keys(doc! { "month": 1 })
            .options(IndexOptions::builder().name("month_idx".to_string()).build())
            .build();

        records.create_index(month_index, None).await.map_err(|e| {
            tracing::error!("Failed to create month index: {}", e);
            AppError::from(e)
        })?;

        let month_city_index = IndexModel::builder()
            .keys(doc! { "month": 1, "city": 1 })
            .options(
                IndexOptions::builder()
                    .name("month_city_idx".to_string())
                    .build(),
            )
            .build();

        records
            .create_index(month_city_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create month/city index: {}", e);
                AppError::from(e)
            })?;

        for field in ["tenant_name", "property_name"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_idx", field))
                        .build(),
                )
                .build();

            records.create_index(index, None).await.map_err(|e| {
                tracing::error!("Failed to create {} index: {}", field, e);
                AppError::from(e)
            })?;
        }

        tracing::info!(
            collection = %self.collection,
            "Created indexes on month, (month, city), tenant_name and property_name"
        );
        Ok(())
    }

    pub fn records(&self) -> Collection<BillingRecord> {
        self.db.collection(&self.collection)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

/// `LedgerStore` backed by a single MongoDB collection.
#[derive(Clone)]
pub struct MongoLedgerStore {
    db: MongoDb,
}

impl MongoLedgerStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &MongoDb {
        &self.db
    }

    async fn find(&self, filter: Document) -> Result<Vec<BillingRecord>, StoreError> {
        let cursor = self.db.records().find(filter, None).await.map_err(|e| {
            tracing::error!("Failed to query billing records: {}", e);
            StoreError::from(e)
        })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect billing records: {}", e);
            StoreError::from(e)
        })
    }
}

#[async_trait]
impl LedgerStore for MongoLedgerStore {
    async fn find_by_month(
        &self,
        month: Month,
        city_pattern: Option<&str>,
    ) -> Result<Vec<BillingRecord>, StoreError> {
        let mut filter = doc! { "month": month.as_str() };
        if let Some(city) = non_blank(city_pattern) {
            filter.insert("city", contains_filter(city));
        }
        self.find(filter).await
    }

    async fn search_by_name_or_property(
        &self,
        text: &str,
    ) -> Result<Vec<BillingRecord>, StoreError> {
        let filter = doc! {
            "$or": [
                { "tenant_name": contains_filter(text) },
                { "property_name": contains_filter(text) },
            ]
        };
        self.find(filter).await
    }

    async fn get(&self, id: &str) -> Result<Option<BillingRecord>, StoreError> {
        self.db
            .records()
            .find_one(id_filter(id), None)
            .await
            .map_err(|e| {
                tracing::error!(record_id = %id, "Failed to fetch billing record: {}", e);
                StoreError::from(e)
            })
    }

    async fn insert(&self, record: NewBillingRecord) -> Result<String, StoreError> {
        validate_new_record(&record)?;
        let record = BillingRecord::create(record);

        self.db
            .records()
            .insert_one(&record, None)
            .await
            .map_err(|e| {
                tracing::error!(record_id = %record.id, "Failed to insert billing record: {}", e);
                StoreError::from(e)
            })?;

        Ok(record.id)
    }

    async fn update_fields(&self, id: &str, update: RecordUpdate) -> Result<(), StoreError> {
        validate_update(&update)?;

        if update.is_empty() {
            return match self.get(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(id.to_string())),
            };
        }

        let mut set = Document::new();
        if let Some(paid) = update.paid_amount {
            let paid = paid
                .to_f64()
                .ok_or_else(|| StoreError::Decode(format!("paid amount {} out of range", paid)))?;
            set.insert("paid_amount", paid);
        }
        if let Some(notes) = update.notes {
            set.insert("notes", notes);
        }

        let result = self
            .db
            .records()
            .update_one(id_filter(id), doc! { "$set": set }, None)
            .await
            .map_err(|e| {
                tracing::error!(record_id = %id, "Failed to update billing record: {}", e);
                StoreError::from(e)
            })?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = self
            .db
            .records()
            .delete_one(id_filter(id), None)
            .await
            .map_err(|e| {
                tracing::error!(record_id = %id, "Failed to delete billing record: {}", e);
                StoreError::from(e)
            })?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::Unavailable(e.to_string())
            })?;
        Ok(())
    }
}
