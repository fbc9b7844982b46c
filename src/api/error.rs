// ==========================================
// 物资申领报表 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把引擎/仓储错误转换为调用方可理解的错误
// ==========================================

use crate::engine::error::ReportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 身份无法解析（请求被拒绝，不返回任何数据）
    #[error("未授权: user_id={user_id}")]
    NotAuthorized { user_id: String },

    /// 过滤/排序字段无效
    #[error("无效的过滤条件: field={field}, {reason}")]
    InvalidFilter { field: String, reason: String },

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::InvalidInput(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),

            // 库内记录损坏，不是调用方输入问题
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }

            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ReportError 转换
// ==========================================
impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotAuthorized { user_id } => ApiError::NotAuthorized { user_id },
            ReportError::InvalidFilter { field, reason } => {
                ApiError::InvalidFilter { field, reason }
            }
            // 补全失败在引擎内已被兜底名称吸收，到达此处属于内部缺陷
            ReportError::EnrichmentUnavailable { kind, id, reason } => {
                ApiError::InternalError(format!("{} id={}: {}", kind, id, reason))
            }
            ReportError::Repository(repo_err) => repo_err.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
