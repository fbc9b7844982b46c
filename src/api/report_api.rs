// ==========================================
// 物资申领报表 - 报表 API
// ==========================================
// 职责: 组合可见范围 → 调用方过滤 → 聚合 → 名称补全
// 红线: 顺序固定，不得跳过或调换
// - 过滤只作用于已收窄的记录集
// - 两个维度的聚合作用于同一记录集
// - 名称补全在分组之后
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::dto::ReportFilters;
use crate::api::error::ApiResult;
use crate::config::ReportConfig;
use crate::domain::filter::{FilterDefinition, FilterSelection};
use crate::domain::report::ReportResult;
use crate::domain::requisition::Requisition;
use crate::engine::aggregation::AggregationEngine;
use crate::engine::error::EngineResult;
use crate::engine::filter_options::FilterOptionBuilder;
use crate::engine::ports::{DirectoryService, RequisitionStore, VisibilityStore};
use crate::engine::predicate::PredicateApplier;
use crate::engine::visibility::VisibilityResolver;

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    resolver: Arc<VisibilityResolver>,
    requisitions: Arc<dyn RequisitionStore>,
    filter_builder: FilterOptionBuilder,
    aggregation: AggregationEngine,
    predicates: PredicateApplier,
}

impl ReportApi {
    /// 创建新的 ReportApi 实例
    ///
    /// # 参数
    /// - requisitions: 申领记录存储
    /// - visibility: 可见范围存储
    /// - directory: 部门/站点目录（名称补全）
    /// - config: 报表运行参数
    pub fn new(
        requisitions: Arc<dyn RequisitionStore>,
        visibility: Arc<dyn VisibilityStore>,
        directory: Arc<dyn DirectoryService>,
        config: &ReportConfig,
    ) -> Self {
        let resolver = Arc::new(VisibilityResolver::new(visibility));
        Self {
            filter_builder: FilterOptionBuilder::new(resolver.clone()),
            aggregation: AggregationEngine::new(directory, config),
            predicates: PredicateApplier::new(),
            resolver,
            requisitions,
        }
    }

    /// 获取过滤器定义（部门 → 站点 → 状态）
    ///
    /// # 参数
    /// - user_id: 当前用户
    /// - current: 上一次提交的选择（可选）
    ///
    /// # 返回
    /// - Err(NotAuthorized): 身份无法解析
    pub async fn get_filter_definitions(
        &self,
        user_id: &str,
        current: Option<&FilterSelection>,
    ) -> ApiResult<Vec<FilterDefinition>> {
        Ok(self
            .filter_builder
            .build_requisition_location_filters(user_id, current)
            .await?)
    }

    /// 按位置汇总申领记录
    ///
    /// # 返回
    /// - Ok(ReportResult): 按部门、按站点两组汇总（可见范围为空时两组均为空）
    /// - Err(NotAuthorized): 身份无法解析
    /// - Err(InvalidFilter): 排序/过滤字段或状态名无效
    pub async fn get_report(&self, filters: &ReportFilters, user_id: &str) -> ApiResult<ReportResult> {
        let records = self.visible_requisitions(filters, user_id).await?;

        let report = self.aggregation.aggregate(&records).await;
        info!(
            user_id = user_id,
            records = records.len(),
            departments = report.by_department.len(),
            stations = report.by_station.len(),
            "申领报表生成完成"
        );
        Ok(report)
    }

    /// 查询可见且满足过滤条件的申领明细（已排序）
    pub async fn list_requisitions(
        &self,
        filters: &ReportFilters,
        user_id: &str,
    ) -> ApiResult<Vec<Requisition>> {
        self.visible_requisitions(filters, user_id).await
    }

    async fn visible_requisitions(
        &self,
        filters: &ReportFilters,
        user_id: &str,
    ) -> ApiResult<Vec<Requisition>> {
        // 1. 可见范围（先于一切调用方过滤）
        let scope = self.resolver.scope_for(user_id).await?;
        let fetched = self.requisitions.find_by_scope(&scope).await?;
        let scoped = scope.narrow(fetched);
        debug!(user_id = user_id, scoped = scoped.len(), "可见范围收窄完成");

        // 2. 调用方过滤
        Ok(self.apply_filters(scoped, filters)?)
    }

    fn apply_filters(
        &self,
        mut records: Vec<Requisition>,
        filters: &ReportFilters,
    ) -> EngineResult<Vec<Requisition>> {
        let statuses = filters.parsed_statuses()?;

        if !filters.department_ids.is_empty() {
            records.retain(|r| {
                filters
                    .department_ids
                    .iter()
                    .any(|id| r.touches_department(*id))
            });
        }
        if !filters.station_ids.is_empty() {
            records.retain(|r| filters.station_ids.iter().any(|id| r.touches_station(*id)));
        }
        if !statuses.is_empty() {
            records.retain(|r| statuses.contains(&r.status));
        }

        for field_filter in &filters.field_filters {
            records =
                self.predicates
                    .filter_equals(records, &field_filter.field, &field_filter.value)?;
        }

        let records = self.predicates.search(records, filters.search.as_deref());
        self.predicates
            .sort(records, filters.sort_column.as_deref(), filters.descending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::FieldFilter;
    use crate::api::error::ApiError;
    use crate::domain::types::RequisitionStatus;
    use crate::domain::visibility::NamedLocation;
    use crate::engine::test_support::{
        requisition, DirectoryMode, InMemoryDirectory, InMemoryRequisitions, InMemoryVisibility,
    };

    fn api(directory: DirectoryMode) -> ReportApi {
        let records = vec![
            requisition(1, Some(10), Some(5), RequisitionStatus::Completed),
            requisition(2, Some(10), Some(5), RequisitionStatus::Completed),
            requisition(3, Some(10), Some(6), RequisitionStatus::PendingApproval),
            requisition(4, Some(30), Some(8), RequisitionStatus::Completed),
            requisition(5, Some(30), Some(8), RequisitionStatus::Draft),
        ];
        let visibility = InMemoryVisibility::default()
            .with_user("E1001", vec![NamedLocation::new(10, "仓储部")], vec![])
            .with_user("E2001", vec![], vec![]);
        let directory = InMemoryDirectory::new(directory)
            .department(10, "仓储部")
            .department(30, "机修部");

        ReportApi::new(
            Arc::new(InMemoryRequisitions(records)),
            Arc::new(visibility),
            Arc::new(directory),
            &ReportConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_report_is_scoped_even_when_store_returns_everything() {
        let report = api(DirectoryMode::Normal)
            .get_report(&ReportFilters::default(), "E1001")
            .await
            .unwrap();

        assert_eq!(report.by_department.len(), 1);
        let dept = report.department(10).unwrap();
        assert_eq!(dept.department_name, "仓储部");
        assert_eq!(dept.count, 3);
        assert_eq!(dept.status_counts.get("Completed"), Some(&2));
        assert_eq!(dept.status_counts.get("PendingApproval"), Some(&1));
        assert!(report.department(30).is_none());
        assert!(report.station(8).is_none());
    }

    #[tokio::test]
    async fn test_filters_cannot_widen_scope() {
        let filters = ReportFilters {
            department_ids: vec![30],
            ..Default::default()
        };
        let report = api(DirectoryMode::Normal)
            .get_report(&filters, "E1001")
            .await
            .unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_status_and_field_filters() {
        let api = api(DirectoryMode::Normal);
        let filters = ReportFilters {
            statuses: vec!["Completed".to_string()],
            field_filters: vec![FieldFilter {
                field: "requisitionNo".to_string(),
                value: "rq-2026-000002".to_string(),
            }],
            ..Default::default()
        };

        let rows = api.list_requisitions(&filters, "E1001").await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.requisition_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_sort_descending_by_created_at() {
        let filters = ReportFilters {
            sort_column: Some("createdAt".to_string()),
            descending: true,
            ..Default::default()
        };
        let rows = api(DirectoryMode::Normal)
            .list_requisitions(&filters, "E1001")
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.requisition_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_invalid_sort_column_is_rejected() {
        let filters = ReportFilters {
            sort_column: Some("NoSuchField".to_string()),
            ..Default::default()
        };
        match api(DirectoryMode::Normal).get_report(&filters, "E1001").await {
            Err(ApiError::InvalidFilter { field, .. }) => assert_eq!(field, "NoSuchField"),
            other => panic!("Expected InvalidFilter, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_user_and_empty_scope() {
        let api = api(DirectoryMode::Normal);
        assert!(matches!(
            api.get_report(&ReportFilters::default(), "E9999").await,
            Err(ApiError::NotAuthorized { .. })
        ));

        let report = api
            .get_report(&ReportFilters::default(), "E2001")
            .await
            .unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_directory_outage_still_returns_report() {
        let report = api(DirectoryMode::Failing)
            .get_report(&ReportFilters::default(), "E1001")
            .await
            .unwrap();
        let dept = report.department(10).unwrap();
        assert_eq!(dept.department_name, "Department 10");
        assert_eq!(dept.count, 3);
    }
}
