// ==========================================
// 引擎层测试支撑: 内存协作者与样例数据
// ==========================================

use crate::domain::requisition::Requisition;
use crate::domain::types::{RequisitionStatus, RequisitionType};
use crate::domain::visibility::{NamedLocation, VisibilityScope};
use crate::engine::ports::{DirectoryService, RequisitionStore, VisibilityStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn requisition(
    id: i64,
    department: Option<i64>,
    station: Option<i64>,
    status: RequisitionStatus,
) -> Requisition {
    Requisition {
        requisition_id: id,
        requisition_no: format!("RQ-2026-{:06}", id),
        issuing_department_id: department,
        issuing_station_id: station,
        delivery_department_id: department,
        delivery_station_id: station,
        status,
        requisition_type: RequisitionType::Transfer,
        created_by: "E1001".to_string(),
        created_at: NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            + chrono::Duration::hours(id),
        remarks: None,
    }
}

/// 内存可见范围存储
#[derive(Default)]
pub struct InMemoryVisibility {
    users: HashMap<String, (Vec<NamedLocation>, Vec<NamedLocation>)>,
}

impl InMemoryVisibility {
    pub fn with_user(
        mut self,
        user_id: &str,
        departments: Vec<NamedLocation>,
        stations: Vec<NamedLocation>,
    ) -> Self {
        self.users
            .insert(user_id.to_string(), (departments, stations));
        self
    }
}

#[async_trait]
impl VisibilityStore for InMemoryVisibility {
    async fn is_known_user(&self, user_id: &str) -> RepositoryResult<bool> {
        Ok(self.users.contains_key(user_id))
    }

    async fn visible_departments(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>> {
        Ok(self
            .users
            .get(user_id)
            .map(|(d, _)| d.clone())
            .unwrap_or_default())
    }

    async fn visible_stations(&self, user_id: &str) -> RepositoryResult<Vec<NamedLocation>> {
        Ok(self
            .users
            .get(user_id)
            .map(|(_, s)| s.clone())
            .unwrap_or_default())
    }
}

/// 内存申领存储（返回全集，不下推范围）
pub struct InMemoryRequisitions(pub Vec<Requisition>);

#[async_trait]
impl RequisitionStore for InMemoryRequisitions {
    async fn find_by_scope(&self, _scope: &VisibilityScope) -> RepositoryResult<Vec<Requisition>> {
        Ok(self.0.clone())
    }
}

/// 目录行为
#[derive(Clone, Copy)]
pub enum DirectoryMode {
    /// 正常查询
    Normal,
    /// 全部失败
    Failing,
    /// 超长延迟
    Slow(Duration),
}

/// 内存目录服务
pub struct InMemoryDirectory {
    departments: HashMap<i64, String>,
    stations: HashMap<i64, String>,
    mode: DirectoryMode,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    /// 同时进行中的查询数峰值
    pub max_in_flight: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new(mode: DirectoryMode) -> Self {
        Self {
            departments: HashMap::new(),
            stations: HashMap::new(),
            mode,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn department(mut self, id: i64, name: &str) -> Self {
        self.departments.insert(id, name.to_string());
        self
    }

    pub fn station(mut self, id: i64, name: &str) -> Self {
        self.stations.insert(id, name.to_string());
        self
    }

    async fn behave(&self) -> RepositoryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = match self.mode {
            DirectoryMode::Normal => Ok(()),
            DirectoryMode::Failing => Err(RepositoryError::DatabaseConnectionError(
                "directory offline".to_string(),
            )),
            DirectoryMode::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    async fn lookup_department(&self, department_id: i64) -> RepositoryResult<Option<NamedLocation>> {
        self.behave().await?;
        Ok(self
            .departments
            .get(&department_id)
            .map(|name| NamedLocation::new(department_id, name.clone())))
    }

    async fn lookup_station(&self, station_id: i64) -> RepositoryResult<Option<NamedLocation>> {
        self.behave().await?;
        Ok(self
            .stations
            .get(&station_id)
            .map(|name| NamedLocation::new(station_id, name.clone())))
    }
}
