//! Ledger persistence seam.
//!
//! Handlers talk to a `LedgerStore` trait object so the MongoDB backend can be
//! swapped for the in-memory one in tests and local runs.

use crate::models::{BillingRecord, Month, NewBillingRecord, RecordUpdate, MAX_AMOUNT};
use async_trait::async_trait;
use rust_decimal::Decimal;
use service_core::error::AppError;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Amounts must not be negative: {}", .0.join(", "))]
    NegativeAmount(Vec<&'static str>),

    #[error("Amounts must not exceed 1000000000: {}", .0.join(", "))]
    AmountOutOfRange(Vec<&'static str>),

    #[error("Billing record not found: {0}")]
    NotFound(String),

    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed billing record: {0}")]
    Decode(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingFields(_)
            | StoreError::NegativeAmount(_)
            | StoreError::AmountOutOfRange(_) => {
                AppError::InvalidInput(anyhow::Error::new(err))
            }
            StoreError::NotFound(_) => AppError::NotFound(anyhow::Error::new(err)),
            StoreError::Unavailable(_) => AppError::ServiceUnavailable(anyhow::Error::new(err)),
            StoreError::Decode(_) => AppError::DatabaseError(anyhow::Error::new(err)),
        }
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Records for `month`, optionally narrowed to cities containing
    /// `city_pattern` (case-insensitive). A blank pattern means no city filter.
    async fn find_by_month(
        &self,
        month: Month,
        city_pattern: Option<&str>,
    ) -> Result<Vec<BillingRecord>, StoreError>;

    /// Records whose tenant or property name contains `text`, ignoring case.
    async fn search_by_name_or_property(
        &self,
        text: &str,
    ) -> Result<Vec<BillingRecord>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<BillingRecord>, StoreError>;

    /// Persists a new record and returns its assigned id.
    async fn insert(&self, record: NewBillingRecord) -> Result<String, StoreError>;

    async fn update_fields(&self, id: &str, update: RecordUpdate) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Schema-on-write check shared by every backend.
pub fn validate_new_record(record: &NewBillingRecord) -> Result<(), StoreError> {
    let missing = record.missing_fields();
    if !missing.is_empty() {
        return Err(StoreError::MissingFields(missing));
    }
    let negative = record.negative_amounts();
    if !negative.is_empty() {
        return Err(StoreError::NegativeAmount(negative));
    }
    let oversized = record.oversized_amounts();
    if !oversized.is_empty() {
        return Err(StoreError::AmountOutOfRange(oversized));
    }
    Ok(())
}

pub fn validate_update(update: &RecordUpdate) -> Result<(), StoreError> {
    match update.paid_amount {
        Some(paid) if paid < Decimal::ZERO => {
            Err(StoreError::NegativeAmount(vec!["paid_amount"]))
        }
        Some(paid) if paid > MAX_AMOUNT => {
            Err(StoreError::AmountOutOfRange(vec!["paid_amount"]))
        }
        _ => Ok(()),
    }
}

/// Returns the pattern unchanged, or `None` when it is blank. Surrounding
/// whitespace is part of the pattern.
pub(crate) fn non_blank(pattern: Option<&str>) -> Option<&str> {
    pattern.filter(|p| !p.trim().is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Process-local store keeping records in insertion order.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    records: RwLock<Vec<BillingRecord>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn find_by_month(
        &self,
        month: Month,
        city_pattern: Option<&str>,
    ) -> Result<Vec<BillingRecord>, StoreError> {
        let city = non_blank(city_pattern);
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.month == month)
            .filter(|r| city.map_or(true, |c| contains_ignore_case(&r.city, c)))
            .cloned()
            .collect())
    }

    async fn search_by_name_or_property(
        &self,
        text: &str,
    ) -> Result<Vec<BillingRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| {
                contains_ignore_case(&r.tenant_name, text)
                    || contains_ignore_case(&r.property_name, text)
            })
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<BillingRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, record: NewBillingRecord) -> Result<String, StoreError> {
        validate_new_record(&record)?;
        let record = BillingRecord::create(record);
        let id = record.id.clone();
        self.records.write().await.push(record);
        tracing::debug!(record_id = %id, "Inserted billing record");
        Ok(id)
    }

    async fn update_fields(&self, id: &str, update: RecordUpdate) -> Result<(), StoreError> {
        validate_update(&update)?;
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.apply(&update);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        records.remove(index);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
