// ==========================================
// 物资申领报表 - 组织目录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: department / station 名称查询（报表名称补全的数据来源）
// ==========================================

use crate::domain::visibility::NamedLocation;
use crate::engine::ports::DirectoryService;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct DirectoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DirectoryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn find_department(&self, department_id: i64) -> RepositoryResult<Option<NamedLocation>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT department_id, name FROM department WHERE department_id = ?1",
                params![department_id],
                |row| Ok(NamedLocation::new(row.get(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(found)
    }

    pub fn find_station(&self, station_id: i64) -> RepositoryResult<Option<NamedLocation>> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT station_id, name FROM station WHERE station_id = ?1",
                params![station_id],
                |row| Ok(NamedLocation::new(row.get(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(found)
    }

    pub fn upsert_department(&self, department_id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO department (department_id, name) VALUES (?1, ?2)
            ON CONFLICT(department_id) DO UPDATE SET name = excluded.name
            "#,
            params![department_id, name],
        )?;
        Ok(())
    }

    pub fn upsert_station(
        &self,
        station_id: i64,
        department_id: Option<i64>,
        name: &str,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO station (station_id, department_id, name) VALUES (?1, ?2, ?3)
            ON CONFLICT(station_id) DO UPDATE SET
                department_id = excluded.department_id,
                name = excluded.name
            "#,
            params![station_id, department_id, name],
        )?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryService for DirectoryRepository {
    async fn lookup_department(&self, department_id: i64) -> RepositoryResult<Option<NamedLocation>> {
        self.find_department(department_id)
    }

    async fn lookup_station(&self, station_id: i64) -> RepositoryResult<Option<NamedLocation>> {
        self.find_station(station_id)
    }
}
