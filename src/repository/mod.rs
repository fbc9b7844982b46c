// ==========================================
// 物资申领报表 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod directory_repo;
pub mod error;
pub mod requisition_repo;
pub mod visibility_repo;

// 重导出核心仓储
pub use directory_repo::DirectoryRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use requisition_repo::RequisitionRepository;
pub use visibility_repo::VisibilityRepository;
