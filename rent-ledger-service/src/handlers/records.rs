use crate::dtos::{
    CreateRecordRequest, CreatedRecordResponse, MetaResponse, RecordListParams,
    RecordListResponse, RecordResponse, SearchParams, TierThreshold, UpdateRecordRequest,
};
use crate::forms::RecordForm;
use crate::models::{status, Category, Month, NewBillingRecord, StatusTier};
use crate::services::{record_write, StoreError};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

async fn load_record(state: &AppState, id: &str) -> Result<RecordResponse, AppError> {
    state
        .store
        .get(id)
        .await?
        .map(RecordResponse::from)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Billing record not found: {}", id)))
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<impl IntoResponse, AppError> {
    let records = state
        .store
        .find_by_month(params.month, params.city.as_deref())
        .await?;

    Ok(Json(RecordListResponse::new(records, || {
        format!("No records found for {}", params.month)
    })))
}

pub async fn search_records(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let records = state
        .store
        .search_by_name_or_property(&params.q)
        .await?;

    tracing::debug!(query = %params.q, matches = records.len(), "Searched billing records");

    Ok(Json(RecordListResponse::new(records, || {
        "No matches found".to_string()
    })))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(load_record(&state, &record_id).await?))
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(payload): Json<CreateRecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.clone();
    let form = RecordForm::edit(payload)
        .submit()
        .persist(|draft| async move { store.insert(NewBillingRecord::from(draft)).await })
        .await?;

    let record_id = form
        .persisted_id()
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Record id missing after save")))?
        .to_string();

    record_write("insert");
    tracing::info!(record_id = %record_id, "Billing record created");

    let record = load_record(&state, &record_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedRecordResponse {
            id: record_id,
            message: "Record saved successfully".to_string(),
            record,
        }),
    ))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.clone();
    let id = record_id.clone();
    RecordForm::edit(payload)
        .submit()
        .persist(|draft| async move {
            store.update_fields(&id, draft.into()).await?;
            Ok::<_, StoreError>(id)
        })
        .await?;

    record_write("update");
    tracing::info!(record_id = %record_id, "Billing record updated");

    Ok(Json(load_record(&state, &record_id).await?))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete(&record_id).await?;

    record_write("delete");
    tracing::info!(record_id = %record_id, "Billing record deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn meta() -> impl IntoResponse {
    Json(MetaResponse {
        months: Month::ALL.to_vec(),
        categories: Category::ALL.to_vec(),
        tiers: StatusTier::ALL
            .iter()
            .map(|tier| TierThreshold {
                tier: *tier,
                label: tier.label(),
                color: tier.color(),
            })
            .collect(),
        pending_limit: status::PENDING_LIMIT,
        overdue_limit: status::OVERDUE_LIMIT,
    })
}
