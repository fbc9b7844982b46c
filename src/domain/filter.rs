// ==========================================
// 物资申领报表 - 过滤器定义
// ==========================================
// 职责: 声明式、与渲染无关的过滤控件描述
// 序列化: camelCase（propertyName / displayName / filterType ...）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 过滤控件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Dropdown,
    Text,
    Date,
    Number,
}

/// 过滤选项（value / text / selected）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

/// 过滤器定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefinition {
    /// 属性名（回传时作为过滤 key）
    pub property_name: String,

    /// 显示名
    pub display_name: String,

    /// 控件类型
    pub filter_type: FilterType,

    /// 可选项
    pub options: Vec<FilterOption>,

    /// 默认值
    pub default_value: Option<String>,

    /// 是否多选
    pub is_multi_select: bool,

    /// 是否可见
    pub is_visible: bool,
}

impl FilterDefinition {
    /// 创建下拉过滤器（默认可见、单选、无默认值）
    pub fn dropdown(property_name: &str, display_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.to_string(),
            display_name: display_name.into(),
            filter_type: FilterType::Dropdown,
            options: Vec::new(),
            default_value: None,
            is_multi_select: false,
            is_visible: true,
        }
    }

    pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
        self.options = options;
        self
    }

    pub fn multi_select(mut self, multi: bool) -> Self {
        self.is_multi_select = multi;
        self
    }

    /// 当前选中项的值
    pub fn selected_values(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect()
    }
}

/// 当前选择（属性名 → 已选值）
///
/// 用于无状态地重新渲染上一次提交的过滤表单。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection(BTreeMap<String, Vec<String>>);

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加选择值（链式）
    pub fn with(mut self, property_name: &str, value: impl Into<String>) -> Self {
        self.insert(property_name, value);
        self
    }

    pub fn insert(&mut self, property_name: &str, value: impl Into<String>) {
        self.0
            .entry(property_name.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn is_selected(&self, property_name: &str, value: &str) -> bool {
        self.0
            .get(property_name)
            .map(|values| values.iter().any(|v| v == value))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }
}
