// ==========================================
// 物资申领报表 - 申领记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: requisition 表读取（可见范围下推）与写入（初始化/测试数据）
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::domain::requisition::Requisition;
use crate::domain::types::{RequisitionStatus, RequisitionType};
use crate::domain::visibility::VisibilityScope;
use crate::engine::ports::RequisitionStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT
        requisition_id, requisition_no,
        issuing_department_id, issuing_station_id,
        delivery_department_id, delivery_station_id,
        status, requisition_type, created_by, created_at, remarks
    FROM requisition"#;

// ==========================================
// RequisitionRepository - 申领记录仓储
// ==========================================
pub struct RequisitionRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 数据库原始行（状态/类型尚未解析）
struct RequisitionRow {
    requisition_id: i64,
    requisition_no: String,
    issuing_department_id: Option<i64>,
    issuing_station_id: Option<i64>,
    delivery_department_id: Option<i64>,
    delivery_station_id: Option<i64>,
    status: String,
    requisition_type: String,
    created_by: String,
    created_at: NaiveDateTime,
    remarks: Option<String>,
}

impl RequisitionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            requisition_id: row.get(0)?,
            requisition_no: row.get(1)?,
            issuing_department_id: row.get(2)?,
            issuing_station_id: row.get(3)?,
            delivery_department_id: row.get(4)?,
            delivery_station_id: row.get(5)?,
            status: row.get(6)?,
            requisition_type: row.get(7)?,
            created_by: row.get(8)?,
            created_at: row.get(9)?,
            remarks: row.get(10)?,
        })
    }

    fn into_domain(self) -> RepositoryResult<Requisition> {
        let status = RequisitionStatus::from_db_str(&self.status).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!(
                    "申领单 {} 的状态值无法识别: {}",
                    self.requisition_id, self.status
                ),
            }
        })?;
        let requisition_type = RequisitionType::from_db_str(&self.requisition_type)
            .ok_or_else(|| RepositoryError::FieldValueError {
                field: "requisition_type".to_string(),
                message: format!(
                    "申领单 {} 的类型值无法识别: {}",
                    self.requisition_id, self.requisition_type
                ),
            })?;

        Ok(Requisition {
            requisition_id: self.requisition_id,
            requisition_no: self.requisition_no,
            issuing_department_id: self.issuing_department_id,
            issuing_station_id: self.issuing_station_id,
            delivery_department_id: self.delivery_department_id,
            delivery_station_id: self.delivery_station_id,
            status,
            requisition_type,
            created_by: self.created_by,
            created_at: self.created_at,
            remarks: self.remarks,
        })
    }
}

/// 生成 `column IN (?, ?, ...)` 片段
fn in_clause(column: &str, n: usize) -> String {
    let placeholders = vec!["?"; n].join(", ");
    format!("{} IN ({})", column, placeholders)
}

impl RequisitionRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入申领记录
    pub fn insert(&self, requisition: &Requisition) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO requisition (
                requisition_id, requisition_no,
                issuing_department_id, issuing_station_id,
                delivery_department_id, delivery_station_id,
                status, requisition_type, created_by, created_at, remarks
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                requisition.requisition_id,
                requisition.requisition_no,
                requisition.issuing_department_id,
                requisition.issuing_station_id,
                requisition.delivery_department_id,
                requisition.delivery_station_id,
                requisition.status.as_str(),
                requisition.requisition_type.as_str(),
                requisition.created_by,
                requisition.created_at,
                requisition.remarks,
            ],
        )?;
        Ok(())
    }

    /// 批量插入（单事务）
    pub fn batch_insert(&self, requisitions: &[Requisition]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO requisition (
                    requisition_id, requisition_no,
                    issuing_department_id, issuing_station_id,
                    delivery_department_id, delivery_station_id,
                    status, requisition_type, created_by, created_at, remarks
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )?;
            for r in requisitions {
                stmt.execute(params![
                    r.requisition_id,
                    r.requisition_no,
                    r.issuing_department_id,
                    r.issuing_station_id,
                    r.delivery_department_id,
                    r.delivery_station_id,
                    r.status.as_str(),
                    r.requisition_type.as_str(),
                    r.created_by,
                    r.created_at,
                    r.remarks,
                ])?;
            }
        }
        tx.commit()?;
        Ok(requisitions.len())
    }

    /// 查询全部申领记录（按主键升序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Requisition>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY requisition_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], RequisitionRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RequisitionRow::into_domain).collect()
    }

    /// 按可见范围查询申领记录
    ///
    /// 申领/收货的部门或站点任一落在范围内即返回；空范围直接返回空集。
    pub fn find_by_scope(&self, scope: &VisibilityScope) -> RepositoryResult<Vec<Requisition>> {
        if scope.is_empty() {
            return Ok(Vec::new());
        }

        let department_ids = scope.department_ids();
        let station_ids = scope.station_ids();

        let mut conditions = Vec::new();
        let mut values: Vec<i64> = Vec::new();
        if !department_ids.is_empty() {
            for column in ["issuing_department_id", "delivery_department_id"] {
                conditions.push(in_clause(column, department_ids.len()));
                values.extend(&department_ids);
            }
        }
        if !station_ids.is_empty() {
            for column in ["issuing_station_id", "delivery_station_id"] {
                conditions.push(in_clause(column, station_ids.len()));
                values.extend(&station_ids);
            }
        }

        let sql = format!(
            "{} WHERE {} ORDER BY requisition_id",
            SELECT_COLUMNS,
            conditions.join(" OR ")
        );

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), RequisitionRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(
            user_id = %scope.user_id,
            count = rows.len(),
            "按可见范围加载申领记录"
        );

        rows.into_iter().map(RequisitionRow::into_domain).collect()
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM requisition", [], |row| row.get(0))?;
        Ok(n)
    }
}

#[async_trait]
impl RequisitionStore for RequisitionRepository {
    async fn find_by_scope(&self, scope: &VisibilityScope) -> RepositoryResult<Vec<Requisition>> {
        RequisitionRepository::find_by_scope(self, scope)
    }
}
