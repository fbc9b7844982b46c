// ==========================================
// 物资申领报表 - 引擎层
// ==========================================
// 职责: 可见范围解析、过滤项构建、动态谓词、聚合
// 红线: Engine 不拼 SQL，数据访问只经由 ports 中的 trait
// ==========================================

pub mod aggregation;
pub mod error;
pub mod filter_options;
pub mod ports;
pub mod predicate;
pub mod visibility;

#[cfg(test)]
pub mod test_support;

// 重导出核心引擎
pub use aggregation::{tally_by, AggregationEngine, GroupTally};
pub use error::{EngineResult, ReportError};
pub use filter_options::{filter_properties, FilterOptionBuilder};
pub use ports::{DirectoryService, RequisitionStore, VisibilityStore};
pub use predicate::{
    FieldDescriptor, FieldKind, FieldRegistry, FieldValue, PredicateApplier, Searchable,
};
pub use visibility::VisibilityResolver;
