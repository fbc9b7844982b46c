// ==========================================
// 物资申领报表 - 引擎层错误类型
// ==========================================
// 传播策略:
// - NotAuthorized / InvalidFilter 向调用方显式返回
// - EnrichmentUnavailable 仅在引擎内部流转，由兜底名称吸收
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    /// 身份无法解析到可见范围（必须中止请求，不得进入聚合）
    #[error("未授权: 用户身份无法解析到可见范围 (user_id={user_id})")]
    NotAuthorized { user_id: String },

    /// 排序/过滤字段不存在于记录结构，或取值非法
    #[error("无效的过滤条件 (field={field}): {reason}")]
    InvalidFilter { field: String, reason: String },

    /// 目录服务查询失败或超时
    #[error("名称补全不可用: {kind} id={id}: {reason}")]
    EnrichmentUnavailable {
        kind: &'static str,
        id: i64,
        reason: String,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReportError {
    /// 未知字段
    pub fn unknown_field(field: &str) -> Self {
        ReportError::InvalidFilter {
            field: field.to_string(),
            reason: "记录结构中不存在该字段".to_string(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, ReportError>;
