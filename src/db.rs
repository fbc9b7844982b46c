// ==========================================
// 物资申领报表 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 提供幂等建表（报表核心只读，但独立运行/测试需要完整 schema）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化报表所需的全部表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS department (
            department_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS station (
            station_id INTEGER PRIMARY KEY,
            department_id INTEGER,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_account (
            user_id TEXT PRIMARY KEY,
            display_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS user_department_scope (
            user_id TEXT NOT NULL REFERENCES user_account(user_id) ON DELETE CASCADE,
            department_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, department_id)
        );

        CREATE TABLE IF NOT EXISTS user_station_scope (
            user_id TEXT NOT NULL REFERENCES user_account(user_id) ON DELETE CASCADE,
            station_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, station_id)
        );

        CREATE TABLE IF NOT EXISTS requisition (
            requisition_id INTEGER PRIMARY KEY,
            requisition_no TEXT NOT NULL,
            issuing_department_id INTEGER,
            issuing_station_id INTEGER,
            delivery_department_id INTEGER,
            delivery_station_id INTEGER,
            status TEXT NOT NULL,
            requisition_type TEXT NOT NULL,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            remarks TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_requisition_issuing_dept
            ON requisition(issuing_department_id);
        CREATE INDEX IF NOT EXISTS idx_requisition_delivery_dept
            ON requisition(delivery_department_id);
        CREATE INDEX IF NOT EXISTS idx_requisition_issuing_station
            ON requisition(issuing_station_id);
        CREATE INDEX IF NOT EXISTS idx_requisition_delivery_station
            ON requisition(delivery_station_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
