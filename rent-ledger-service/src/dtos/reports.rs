use super::records::RecordResponse;
use crate::models::{Category, Month, StatusTier};
use crate::services::aggregation::LedgerTotals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub month: Month,
    pub city: Option<String>,
}

/// Live status view for one month: headline totals plus tenant cards,
/// highest debt first.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub month: Month,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub totals: LedgerTotals,
    pub status_counts: BTreeMap<StatusTier, usize>,
    pub tenants: Vec<RecordResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CityRow {
    pub city: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub billed: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub billed: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub month: Month,
    pub totals: LedgerTotals,
    pub by_city: Vec<CityRow>,
    pub by_category: Vec<CategoryRow>,
    pub records: Vec<RecordResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
