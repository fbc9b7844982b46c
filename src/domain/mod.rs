// ==========================================
// 物资申领报表 - 领域模型层
// ==========================================
// 职责: 定义申领实体、可见范围、过滤器定义、聚合结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod filter;
pub mod report;
pub mod requisition;
pub mod types;
pub mod visibility;

// 重导出核心类型
pub use filter::{FilterDefinition, FilterOption, FilterSelection, FilterType};
pub use report::{DepartmentSummary, ReportResult, StationSummary};
pub use requisition::{Requisition, UNASSIGNED_ID};
pub use types::{RequisitionStatus, RequisitionType};
pub use visibility::{NamedLocation, VisibilityScope};
