use crate::models::{
    BillingRecord, Category, ColorTier, Month, NewBillingRecord, Palette, RecordUpdate, StatusTier,
    MAX_AMOUNT,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn valid_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Amount must not be negative".into());
        return Err(err);
    }
    if *value > MAX_AMOUNT {
        let mut err = ValidationError::new("max_amount");
        err.message = Some("Amount must not exceed 1,000,000,000".into());
        return Err(err);
    }
    Ok(())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Search text is required".into());
        return Err(err);
    }
    Ok(())
}

/// Payload of the "add new invoice" form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Property name is required"))]
    pub property_name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Tenant name is required"))]
    pub tenant_name: String,
    pub month: Month,
    pub category: Category,
    #[serde(default)]
    #[validate(custom(function = "valid_amount"))]
    pub billed_amount: Decimal,
    #[serde(default)]
    #[validate(custom(function = "valid_amount"))]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub notes: String,
}

impl From<CreateRecordRequest> for NewBillingRecord {
    fn from(req: CreateRecordRequest) -> Self {
        Self {
            city: req.city,
            property_name: req.property_name,
            unit: req.unit,
            tenant_name: req.tenant_name,
            month: req.month,
            category: req.category,
            billed_amount: req.billed_amount,
            paid_amount: req.paid_amount,
            notes: req.notes,
        }
    }
}

/// Payload of the edit form. Only these two fields are mutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecordRequest {
    #[validate(custom(function = "valid_amount"))]
    pub paid_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl From<UpdateRecordRequest> for RecordUpdate {
    fn from(req: UpdateRecordRequest) -> Self {
        Self {
            paid_amount: req.paid_amount,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordListParams {
    pub month: Month,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub tier: StatusTier,
    pub label: &'static str,
    pub color: ColorTier,
    #[serde(flatten)]
    pub palette: Palette,
}

impl From<StatusTier> for StatusView {
    fn from(tier: StatusTier) -> Self {
        Self {
            tier,
            label: tier.label(),
            color: tier.color(),
            palette: tier.palette(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: String,
    pub city: String,
    pub property_name: String,
    pub unit: String,
    pub tenant_name: String,
    pub month: Month,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub billed_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub outstanding: Decimal,
    pub status: StatusView,
    pub notes: String,
    pub created_at: String,
}

impl From<BillingRecord> for RecordResponse {
    fn from(record: BillingRecord) -> Self {
        let outstanding = record.outstanding();
        let status = StatusView::from(record.status());
        Self {
            id: record.id,
            city: record.city,
            property_name: record.property_name,
            unit: record.unit,
            tenant_name: record.tenant_name,
            month: record.month,
            category: record.category,
            billed_amount: record.billed_amount,
            paid_amount: record.paid_amount,
            outstanding,
            status,
            notes: record.notes,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub records: Vec<RecordResponse>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecordListResponse {
    pub fn new(records: Vec<BillingRecord>, empty_message: impl FnOnce() -> String) -> Self {
        let message = records.is_empty().then(empty_message);
        let records: Vec<RecordResponse> = records.into_iter().map(RecordResponse::from).collect();
        Self {
            count: records.len(),
            records,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedRecordResponse {
    pub id: String,
    pub message: String,
    pub record: RecordResponse,
}

#[derive(Debug, Serialize)]
pub struct TierThreshold {
    pub tier: StatusTier,
    pub label: &'static str,
    pub color: ColorTier,
}

/// Enumerations the record forms offer as choices.
#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub months: Vec<Month>,
    pub categories: Vec<Category>,
    pub tiers: Vec<TierThreshold>,
    #[serde(with = "rust_decimal::serde::float")]
    pub pending_limit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub overdue_limit: Decimal,
}
