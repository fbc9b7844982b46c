// ==========================================
// 物资申领报表 - 应用层
// ==========================================
// 职责: 从数据库路径装配仓储、配置与报表 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
