// ==========================================
// 物资申领报表 - 可见范围解析器
// ==========================================
// 职责: 用户身份 → 可见部门/站点集合；按范围收窄记录集
// 红线: 身份无法解析时返回 NotAuthorized，
//       不得退化为空范围或不受限范围
// ==========================================

use crate::domain::requisition::Requisition;
use crate::domain::visibility::VisibilityScope;
use crate::engine::error::{EngineResult, ReportError};
use crate::engine::ports::VisibilityStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// 可见范围解析器
pub struct VisibilityResolver {
    store: Arc<dyn VisibilityStore>,
}

impl VisibilityResolver {
    pub fn new(store: Arc<dyn VisibilityStore>) -> Self {
        Self { store }
    }

    /// 解析用户可见范围
    ///
    /// 部门与站点两次查询互不依赖，并发执行。
    ///
    /// # 返回
    /// - Ok(VisibilityScope): 可能为空（用户存在但未授权任何位置）
    /// - Err(NotAuthorized): 身份为空、未知或已停用
    pub async fn scope_for(&self, user_id: &str) -> EngineResult<VisibilityScope> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            warn!("可见范围解析失败: 用户身份为空");
            return Err(ReportError::NotAuthorized {
                user_id: String::new(),
            });
        }

        if !self.store.is_known_user(user_id).await? {
            warn!(user_id = user_id, "可见范围解析失败: 用户身份无法解析");
            return Err(ReportError::NotAuthorized {
                user_id: user_id.to_string(),
            });
        }

        let (departments, stations) = futures::try_join!(
            self.store.visible_departments(user_id),
            self.store.visible_stations(user_id),
        )?;

        let scope = VisibilityScope::new(user_id, departments, stations);
        debug!(
            user_id = user_id,
            departments = ?scope.department_ids(),
            stations = ?scope.station_ids(),
            "可见范围解析完成"
        );
        Ok(scope)
    }

    /// 按用户可见范围收窄记录集
    pub async fn narrow(
        &self,
        records: Vec<Requisition>,
        user_id: &str,
    ) -> EngineResult<Vec<Requisition>> {
        let scope = self.scope_for(user_id).await?;
        Ok(scope.narrow(records))
    }
}
