// ==========================================
// 物资申领报表 - 引擎层外部协作接口
// ==========================================
// 职责: 定义报表核心所依赖的外部协作者 trait（依赖倒置）
// 说明: Engine 层定义 trait，Repository 层提供 SQLite 实现，
//       测试可替换为内存实现
// ==========================================

use crate::domain::requisition::Requisition;
use crate::domain::visibility::{NamedLocation, VisibilityScope};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 申领记录存储
///
/// 实现可以把可见范围下推为查询条件，也可以返回超集；
/// 报表门面在取数后总会按范围再收窄一次。
#[async_trait]
pub trait RequisitionStore: Send + Sync {
    async fn find_by_scope(&self, scope: &VisibilityScope) -> RepositoryResult<Vec<Requisition>>;
}

/// 可见范围存储
#[async_trait]
pub trait VisibilityStore: Send + Sync {
    /// 身份是否可解析（未知或停用用户返回 false）
    async fn is_known_user(&self, user_id: &str) -> RepositoryResult<bool>;

    /// 用户可见部门
    async fn visible_departments(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>>;

    /// 用户可见站点
    async fn visible_stations(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>>;
}

/// 组织目录服务
///
/// 返回 Ok(None) 表示"未找到"，属于正常的兜底场景而非错误。
#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn lookup_department(&self, department_id: i64) -> RepositoryResult<Option<NamedLocation>>;

    async fn lookup_station(&self, station_id: i64) -> RepositoryResult<Option<NamedLocation>>;
}
