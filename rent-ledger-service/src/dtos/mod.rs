pub mod records;
pub mod reports;

pub use records::{
    CreateRecordRequest, CreatedRecordResponse, MetaResponse, RecordListParams,
    RecordListResponse, RecordResponse, SearchParams, StatusView, TierThreshold,
    UpdateRecordRequest,
};
pub use reports::{CategoryRow, CityRow, DashboardParams, DashboardResponse, ReportResponse};
