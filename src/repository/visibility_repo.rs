// ==========================================
// 物资申领报表 - 可见范围仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: user_account / user_department_scope / user_station_scope 读写
// ==========================================

use crate::domain::visibility::NamedLocation;
use crate::engine::ports::VisibilityStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// VisibilityRepository - 可见范围仓储
// ==========================================
pub struct VisibilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VisibilityRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 用户是否可解析（存在且启用）
    pub fn is_active_user(&self, user_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let active: Option<i64> = conn
            .query_row(
                "SELECT is_active FROM user_account WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(matches!(active, Some(flag) if flag != 0))
    }

    /// 用户可见部门（目录中缺名称时使用兜底标签）
    pub fn find_departments(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.department_id,
                   COALESCE(d.name, 'Department ' || s.department_id)
            FROM user_department_scope s
            LEFT JOIN department d ON d.department_id = s.department_id
            WHERE s.user_id = ?1
            ORDER BY s.department_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(NamedLocation::new(row.get(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 用户可见站点（目录中缺名称时使用兜底标签）
    pub fn find_stations(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.station_id,
                   COALESCE(st.name, 'Station ' || s.station_id)
            FROM user_station_scope s
            LEFT JOIN station st ON st.station_id = s.station_id
            WHERE s.user_id = ?1
            ORDER BY s.station_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(NamedLocation::new(row.get(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 新增或更新用户
    pub fn upsert_user(
        &self,
        user_id: &str,
        display_name: Option<&str>,
        is_active: bool,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO user_account (user_id, display_name, is_active)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                is_active = excluded.is_active
            "#,
            params![user_id, display_name, is_active as i64],
        )?;
        Ok(())
    }

    /// 授予部门可见权限
    pub fn grant_department(&self, user_id: &str, department_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO user_department_scope (user_id, department_id) VALUES (?1, ?2)",
            params![user_id, department_id],
        )?;
        Ok(())
    }

    /// 授予站点可见权限
    pub fn grant_station(&self, user_id: &str, station_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO user_station_scope (user_id, station_id) VALUES (?1, ?2)",
            params![user_id, station_id],
        )?;
        Ok(())
    }
}

#[async_trait]
impl VisibilityStore for VisibilityRepository {
    async fn is_known_user(&self, user_id: &str) -> RepositoryResult<bool> {
        self.is_active_user(user_id)
    }

    async fn visible_departments(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>> {
        self.find_departments(user_id)
    }

    async fn visible_stations(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>> {
        self.find_stations(user_id)
    }
}
