// ==========================================
// 物资申领报表 - 过滤项构建器
// ==========================================
// 职责: 依据用户可见范围生成声明式过滤器定义
// 红线: 部门/站点选项只能来自可见范围，不得暴露不可见数据
// 顺序: 部门 → 站点 → 状态（固定，调用方按此顺序渲染）
// ==========================================

use crate::domain::filter::{FilterDefinition, FilterOption, FilterSelection};
use crate::domain::types::RequisitionStatus;
use crate::domain::visibility::{NamedLocation, VisibilityScope};
use crate::engine::error::EngineResult;
use crate::engine::visibility::VisibilityResolver;
use crate::i18n::t;
use std::sync::Arc;

/// 过滤属性名（回传 key，与 ReportFilters 的 JSON 字段一致）
pub mod filter_properties {
    pub const DEPARTMENT_ID: &str = "departmentIds";
    pub const STATION_ID: &str = "stationIds";
    pub const STATUS: &str = "statuses";
}

/// 过滤项构建器
pub struct FilterOptionBuilder {
    resolver: Arc<VisibilityResolver>,
}

impl FilterOptionBuilder {
    pub fn new(resolver: Arc<VisibilityResolver>) -> Self {
        Self { resolver }
    }

    /// 构建申领位置过滤器（部门、站点、状态）
    ///
    /// # 参数
    /// - user_id: 当前用户
    /// - current: 上一次提交的选择（可选），匹配的选项标记 selected
    ///
    /// # 返回
    /// - Ok(Vec<FilterDefinition>): 固定顺序的三个过滤器定义
    /// - Err(NotAuthorized): 身份无法解析
    pub async fn build_requisition_location_filters(
        &self,
        user_id: &str,
        current: Option<&FilterSelection>,
    ) -> EngineResult<Vec<FilterDefinition>> {
        let scope = self.resolver.scope_for(user_id).await?;
        Ok(Self::build_from_scope(&scope, current))
    }

    /// 按已解析的范围构建
    pub fn build_from_scope(
        scope: &VisibilityScope,
        current: Option<&FilterSelection>,
    ) -> Vec<FilterDefinition> {
        let empty = FilterSelection::new();
        let selection = current.unwrap_or(&empty);

        vec![
            FilterDefinition::dropdown(filter_properties::DEPARTMENT_ID, t("filter.department"))
                .with_options(location_options(
                    &scope.departments(),
                    filter_properties::DEPARTMENT_ID,
                    selection,
                ))
                .multi_select(true),
            FilterDefinition::dropdown(filter_properties::STATION_ID, t("filter.station"))
                .with_options(location_options(
                    &scope.stations(),
                    filter_properties::STATION_ID,
                    selection,
                ))
                .multi_select(true),
            FilterDefinition::dropdown(filter_properties::STATUS, t("filter.status"))
                .with_options(status_options(selection))
                .multi_select(true),
        ]
    }
}

fn location_options(
    locations: &[NamedLocation],
    property_name: &str,
    selection: &FilterSelection,
) -> Vec<FilterOption> {
    locations
        .iter()
        .map(|loc| {
            let value = loc.id.to_string();
            FilterOption {
                selected: selection.is_selected(property_name, &value),
                text: loc.name.clone(),
                value,
            }
        })
        .collect()
}

// 状态本身不受可见范围限制，始终给出全部枚举值
fn status_options(selection: &FilterSelection) -> Vec<FilterOption> {
    RequisitionStatus::ALL
        .iter()
        .map(|status| FilterOption {
            value: status.as_str().to_string(),
            text: t(&status.label_key()),
            selected: selection.is_selected(filter_properties::STATUS, status.as_str()),
        })
        .collect()
}
