// ==========================================
// 物资申领报表 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + Tokio
// 系统定位: 申领跟踪系统的报表子系统
//           可见范围过滤 → 动态谓词 → 按部门/站点聚合
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 报表核心规则
pub mod engine;

// 配置层 - 运行参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 报表门面
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RequisitionStatus, RequisitionType};

// 领域实体
pub use domain::{
    DepartmentSummary, FilterDefinition, FilterOption, FilterSelection, FilterType,
    NamedLocation, ReportResult, Requisition, StationSummary, VisibilityScope,
};

// 引擎
pub use engine::{AggregationEngine, FilterOptionBuilder, PredicateApplier, VisibilityResolver};

// API
pub use api::{ApiError, ApiResult, ReportApi, ReportFilters};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "物资申领报表";
