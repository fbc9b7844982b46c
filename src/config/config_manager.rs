// ==========================================
// 物资申领报表 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::report_config::ReportConfig;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 报表配置 =====

    /// 加载报表配置
    ///
    /// 缺失的键使用默认值；格式错误或越界的值记 warn 后使用默认值。
    pub fn load_report_config(&self) -> Result<ReportConfig, Box<dyn Error>> {
        let defaults = ReportConfig::default();

        let enrichment_concurrency = self
            .parse_or_default(
                config_keys::ENRICHMENT_CONCURRENCY,
                defaults.enrichment_concurrency,
            )?;
        let enrichment_concurrency = if enrichment_concurrency < 1 {
            tracing::warn!(
                config_key = config_keys::ENRICHMENT_CONCURRENCY,
                raw_value = enrichment_concurrency,
                "补全并发度必须 >= 1，使用默认值"
            );
            defaults.enrichment_concurrency
        } else {
            enrichment_concurrency
        };

        let enrichment_timeout_ms = self.parse_or_default(
            config_keys::ENRICHMENT_TIMEOUT_MS,
            defaults.enrichment_timeout_ms,
        )?;
        let sort_summaries_by_key = self.parse_or_default(
            config_keys::SORT_SUMMARIES_BY_KEY,
            defaults.sort_summaries_by_key,
        )?;

        let locale = match self.get_global_config_value(config_keys::UI_LOCALE)? {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => defaults.locale,
        };

        Ok(ReportConfig {
            enrichment_concurrency,
            enrichment_timeout_ms,
            sort_summaries_by_key,
            locale,
        })
    }

    fn parse_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy,
    {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        Ok(raw.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
            default
        }))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 名称补全
    pub const ENRICHMENT_CONCURRENCY: &str = "report.enrichment_concurrency";
    pub const ENRICHMENT_TIMEOUT_MS: &str = "report.enrichment_timeout_ms";

    // 输出顺序
    pub const SORT_SUMMARIES_BY_KEY: &str = "report.sort_summaries_by_key";

    // 界面语言
    pub const UI_LOCALE: &str = "ui.locale";
}
