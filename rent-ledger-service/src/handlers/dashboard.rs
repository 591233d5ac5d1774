use crate::dtos::{
    CategoryRow, CityRow, DashboardParams, DashboardResponse, RecordResponse, ReportResponse,
};
use crate::models::Month;
use crate::services::aggregation::{
    group_by_category, group_by_city, sort_by_outstanding, tier_counts, totals,
};
use crate::services::record_status_tiers;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

fn empty_month_message(month: Month) -> String {
    format!("No records found for {}. Add records to get started.", month)
}

/// Live status board: tenant cards for one month, highest outstanding first.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut records = state
        .store
        .find_by_month(params.month, params.city.as_deref())
        .await?;

    sort_by_outstanding(&mut records);
    let totals = totals(&records)?;
    let status_counts = tier_counts(&records);
    record_status_tiers(&status_counts);

    tracing::debug!(
        month = %params.month,
        records = records.len(),
        outstanding = %totals.outstanding,
        "Built dashboard"
    );

    let message = records
        .is_empty()
        .then(|| empty_month_message(params.month));

    Ok(Json(DashboardResponse {
        month: params.month,
        city: params.city,
        totals,
        status_counts,
        tenants: records.into_iter().map(RecordResponse::from).collect(),
        message,
    }))
}

/// Monthly report: collections per city, billing per category and the
/// full record table in store order.
pub async fn report(
    State(state): State<AppState>,
    Path(month): Path<Month>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.store.find_by_month(month, None).await?;

    let by_city = group_by_city(&records)?
        .into_iter()
        .map(|(city, collected)| CityRow {
            city,
            billed: collected.billed,
            paid: collected.paid,
        })
        .collect();

    let by_category = group_by_category(&records)?
        .into_iter()
        .map(|(category, billed)| CategoryRow { category, billed })
        .collect();

    let message = records.is_empty().then(|| empty_month_message(month));

    Ok(Json(ReportResponse {
        month,
        totals: totals(&records)?,
        by_city,
        by_category,
        records: records.into_iter().map(RecordResponse::from).collect(),
        message,
    }))
}
