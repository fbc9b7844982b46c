// ==========================================
// 物资申领报表 - 动态谓词应用器
// ==========================================
// 职责: 对任意记录集合执行全文检索、按列排序、按字段等值过滤
// 设计: 每种记录结构注册一次字段表（字段名 → 类型 + 取值函数），
//       检索/排序按字段表通用执行，不为单个报表手写谓词
// 红线: 未知列名必须返回 InvalidFilter，不得静默忽略
// ==========================================

use crate::domain::requisition::Requisition;
use crate::engine::error::{EngineResult, ReportError};
use chrono::NaiveDateTime;
use std::sync::OnceLock;

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 数值（可空）
    Number,
    /// 文本（参与全文检索）
    Text,
    /// 枚举（按规范名比较，不参与全文检索）
    Enum,
    /// 日期时间
    DateTime,
}

/// 字段取值
///
/// 排序时空值最小（升序排在最前）。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Null,
    Int(i64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// 可空整数
    pub fn int(value: Option<i64>) -> Self {
        value.map(FieldValue::Int).unwrap_or(FieldValue::Null)
    }

    /// 可空文本
    pub fn text(value: Option<&str>) -> Self {
        value
            .map(|s| FieldValue::Text(s.to_string()))
            .unwrap_or(FieldValue::Null)
    }

    /// 渲染为过滤比较用的字符串
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// 字段描述
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    accessor: fn(&T) -> FieldValue,
}

impl<T> FieldDescriptor<T> {
    pub fn value_of(&self, record: &T) -> FieldValue {
        (self.accessor)(record)
    }
}

/// 字段注册表（每种记录结构一份）
pub struct FieldRegistry<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> FieldRegistry<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// 注册字段（链式）
    pub fn field(mut self, name: &'static str, kind: FieldKind, accessor: fn(&T) -> FieldValue) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            kind,
            accessor,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 按名称解析字段，不存在时返回 InvalidFilter
    pub fn resolve(&self, name: &str) -> EngineResult<&FieldDescriptor<T>> {
        self.get(name).ok_or_else(|| ReportError::unknown_field(name))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// 参与全文检索的文本字段
    pub fn text_fields(&self) -> impl Iterator<Item = &FieldDescriptor<T>> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Text)
    }
}

impl<T> Default for FieldRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 可动态检索/排序的记录结构
pub trait Searchable: Sized + 'static {
    fn registry() -> &'static FieldRegistry<Self>;
}

impl Searchable for Requisition {
    fn registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<Requisition>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::<Requisition>::new()
                .field("requisitionId", FieldKind::Number, |r| FieldValue::Int(r.requisition_id))
                .field("requisitionNo", FieldKind::Text, |r| {
                    FieldValue::Text(r.requisition_no.clone())
                })
                .field("issuingDepartmentId", FieldKind::Number, |r| {
                    FieldValue::int(r.issuing_department_id)
                })
                .field("issuingStationId", FieldKind::Number, |r| {
                    FieldValue::int(r.issuing_station_id)
                })
                .field("deliveryDepartmentId", FieldKind::Number, |r| {
                    FieldValue::int(r.delivery_department_id)
                })
                .field("deliveryStationId", FieldKind::Number, |r| {
                    FieldValue::int(r.delivery_station_id)
                })
                .field("status", FieldKind::Enum, |r| {
                    FieldValue::Text(r.status.as_str().to_string())
                })
                .field("requisitionType", FieldKind::Enum, |r| {
                    FieldValue::Text(r.requisition_type.as_str().to_string())
                })
                .field("createdBy", FieldKind::Text, |r| FieldValue::Text(r.created_by.clone()))
                .field("createdAt", FieldKind::DateTime, |r| FieldValue::DateTime(r.created_at))
                .field("remarks", FieldKind::Text, |r| FieldValue::text(r.remarks.as_deref()))
        })
    }
}

// ==========================================
// PredicateApplier - 动态谓词应用器
// ==========================================
pub struct PredicateApplier {
    // 无状态引擎,不需要注入依赖
}

impl PredicateApplier {
    pub fn new() -> Self {
        Self {}
    }

    /// 全文检索
    ///
    /// - term 为空/空白: 原样返回
    /// - 记录结构无文本字段: 原样返回
    /// - 否则保留任一文本字段（忽略大小写）包含 term 原文的记录
    pub fn search<T: Searchable>(&self, records: Vec<T>, term: Option<&str>) -> Vec<T> {
        // 空白只用于判断是否检索，匹配时保留原始词（含首尾空格）
        let term = match term {
            Some(t) if !t.trim().is_empty() => t.to_lowercase(),
            _ => return records,
        };

        let registry = T::registry();
        if registry.text_fields().next().is_none() {
            return records;
        }

        records
            .into_iter()
            .filter(|record| {
                registry.text_fields().any(|field| match field.value_of(record) {
                    FieldValue::Text(s) => s.to_lowercase().contains(&term),
                    _ => false,
                })
            })
            .collect()
    }

    /// 按列排序（稳定排序）
    ///
    /// - column 为空/空白: 原样返回
    /// - column 不存在: InvalidFilter
    pub fn sort<T: Searchable>(
        &self,
        mut records: Vec<T>,
        column: Option<&str>,
        descending: bool,
    ) -> EngineResult<Vec<T>> {
        let column = match column.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(records),
        };

        let field = T::registry().resolve(column)?;
        if descending {
            records.sort_by(|a, b| field.value_of(b).cmp(&field.value_of(a)));
        } else {
            records.sort_by(|a, b| field.value_of(a).cmp(&field.value_of(b)));
        }
        Ok(records)
    }

    /// 按字段等值过滤（文本字段忽略大小写）
    pub fn filter_equals<T: Searchable>(
        &self,
        records: Vec<T>,
        field_name: &str,
        value: &str,
    ) -> EngineResult<Vec<T>> {
        let field = T::registry().resolve(field_name)?;
        let case_insensitive = field.kind == FieldKind::Text;

        Ok(records
            .into_iter()
            .filter(|record| match field.value_of(record).render() {
                Some(actual) if case_insensitive => actual.eq_ignore_ascii_case(value),
                Some(actual) => actual == value,
                None => false,
            })
            .collect())
    }
}

impl Default for PredicateApplier {
    fn default() -> Self {
        Self::new()
    }
}
