// ==========================================
// 物资申领报表 - API 层
// ==========================================
// 职责: 对外的报表门面，统一错误类型
// ==========================================

pub mod dto;
pub mod error;
pub mod report_api;

// 重导出核心类型
pub use dto::{FieldFilter, ReportFilters};
pub use error::{ApiError, ApiResult};
pub use report_api::ReportApi;
