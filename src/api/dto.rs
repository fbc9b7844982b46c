// ==========================================
// 物资申领报表 - 请求 DTO
// ==========================================
// 序列化: camelCase
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::filter::FilterSelection;
use crate::domain::types::RequisitionStatus;
use crate::engine::error::{EngineResult, ReportError};
use crate::engine::filter_options::filter_properties;
use serde::{Deserialize, Serialize};

/// 字段等值过滤（字段名经字段注册表解析）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

/// 调用方提交的报表过滤条件
///
/// 全部条件只在可见范围收窄之后生效，无法扩大可见范围。
/// 未知 key 直接拒绝，不静默丢弃。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ReportFilters {
    /// 全文检索词
    pub search: Option<String>,

    /// 排序列
    pub sort_column: Option<String>,

    /// 是否降序
    pub descending: bool,

    /// 部门（申领或收货任一侧命中）
    pub department_ids: Vec<i64>,

    /// 站点（申领或收货任一侧命中）
    pub station_ids: Vec<i64>,

    /// 状态名（如 "Completed"）
    pub statuses: Vec<String>,

    pub field_filters: Vec<FieldFilter>,
}

impl ReportFilters {
    /// 解析调用方提交的 JSON
    ///
    /// # 错误
    /// - 未知 key → InvalidFilter(field = 该 key)
    /// - 其他格式错误 → InvalidInput
    pub fn from_json(raw: &str) -> ApiResult<Self> {
        serde_json::from_str(raw).map_err(|err| {
            let message = err.to_string();
            match unknown_field_name(&message) {
                Some(field) => ApiError::InvalidFilter {
                    field: field.to_string(),
                    reason: "不支持的过滤条件".to_string(),
                },
                None => ApiError::InvalidInput(format!("过滤条件不是合法的 JSON: {}", message)),
            }
        })
    }

    /// 解析状态名
    ///
    /// 未知状态名返回 InvalidFilter(field = "statuses")
    pub fn parsed_statuses(&self) -> EngineResult<Vec<RequisitionStatus>> {
        self.statuses
            .iter()
            .map(|name| {
                RequisitionStatus::from_db_str(name.trim()).ok_or_else(|| {
                    ReportError::InvalidFilter {
                        field: filter_properties::STATUS.to_string(),
                        reason: format!("未知的申领状态: {}", name),
                    }
                })
            })
            .collect()
    }

    /// 转换为过滤表单的当前选择（用于重新渲染）
    pub fn to_selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::new();
        for id in &self.department_ids {
            selection.insert(filter_properties::DEPARTMENT_ID, id.to_string());
        }
        for id in &self.station_ids {
            selection.insert(filter_properties::STATION_ID, id.to_string());
        }
        for status in &self.statuses {
            selection.insert(filter_properties::STATUS, status.trim());
        }
        selection
    }
}

// serde 报错格式: unknown field `xxx`, expected one of ...
fn unknown_field_name(message: &str) -> Option<&str> {
    message
        .strip_prefix("unknown field `")
        .and_then(|rest| rest.split('`').next())
}
