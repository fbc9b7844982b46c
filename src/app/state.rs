// ==========================================
// 物资申领报表 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::ReportApi;
use crate::config::{ConfigManager, ReportConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{DirectoryRepository, RequisitionRepository, VisibilityRepository};

/// 默认数据库文件名
const DB_FILE_NAME: &str = "requisition_report.db";

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "REQUISITION_REPORT_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接（仓储与配置共用）
    pub conn: Arc<Mutex<Connection>>,

    /// 加载时生效的报表配置
    pub config: ReportConfig,

    /// 报表API
    pub report_api: Arc<ReportApi>,

    /// 申领记录仓储（数据维护）
    pub requisition_repo: Arc<RequisitionRepository>,

    /// 可见范围仓储（授权维护）
    pub visibility_repo: Arc<VisibilityRepository>,

    /// 部门/站点目录仓储
    pub directory_repo: Arc<DirectoryRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化表结构（幂等）
    /// 2. 加载报表配置并设置界面语言
    /// 3. 初始化Repository与报表API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        let config = config_manager
            .load_report_config()
            .map_err(|e| format!("报表配置加载失败: {}", e))?;
        crate::i18n::set_locale(&config.locale);

        // ==========================================
        // Repository层
        // ==========================================
        let requisition_repo = Arc::new(RequisitionRepository::new(conn.clone()));
        let visibility_repo = Arc::new(VisibilityRepository::new(conn.clone()));
        let directory_repo = Arc::new(DirectoryRepository::new(conn.clone()));

        // ==========================================
        // API层
        // ==========================================
        let report_api = Arc::new(ReportApi::new(
            requisition_repo.clone(),
            visibility_repo.clone(),
            directory_repo.clone(),
            &config,
        ));

        tracing::info!(
            enrichment_concurrency = config.enrichment_concurrency,
            enrichment_timeout_ms = config.enrichment_timeout_ms,
            locale = %config.locale,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            conn,
            config,
            report_api,
            requisition_repo,
            visibility_repo,
            directory_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("requisition-report");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
