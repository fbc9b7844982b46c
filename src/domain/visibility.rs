// ==========================================
// 物资申领报表 - 可见范围
// ==========================================
// 职责: 描述单个用户可见的部门集合与站点集合
// 生命周期: 单次请求内计算，不持久化
// ==========================================

use crate::domain::requisition::Requisition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 具名位置（部门或站点）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLocation {
    pub id: i64,
    pub name: String,
}

impl NamedLocation {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// 用户可见范围
///
/// 空范围是合法状态（用户存在但无任何授权），与"身份无法解析"不同，
/// 后者在解析阶段即报 NotAuthorized。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityScope {
    pub user_id: String,
    departments: BTreeMap<i64, String>,
    stations: BTreeMap<i64, String>,
}

impl VisibilityScope {
    pub fn new(
        user_id: impl Into<String>,
        departments: impl IntoIterator<Item = NamedLocation>,
        stations: impl IntoIterator<Item = NamedLocation>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            departments: departments.into_iter().map(|l| (l.id, l.name)).collect(),
            stations: stations.into_iter().map(|l| (l.id, l.name)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty() && self.stations.is_empty()
    }

    pub fn contains_department(&self, department_id: i64) -> bool {
        self.departments.contains_key(&department_id)
    }

    pub fn contains_station(&self, station_id: i64) -> bool {
        self.stations.contains_key(&station_id)
    }

    /// 可见部门 ID（升序）
    pub fn department_ids(&self) -> Vec<i64> {
        self.departments.keys().copied().collect()
    }

    /// 可见站点 ID（升序）
    pub fn station_ids(&self) -> Vec<i64> {
        self.stations.keys().copied().collect()
    }

    /// 可见部门（按 ID 升序）
    pub fn departments(&self) -> Vec<NamedLocation> {
        self.departments
            .iter()
            .map(|(id, name)| NamedLocation::new(*id, name.clone()))
            .collect()
    }

    /// 可见站点（按 ID 升序）
    pub fn stations(&self) -> Vec<NamedLocation> {
        self.stations
            .iter()
            .map(|(id, name)| NamedLocation::new(*id, name.clone()))
            .collect()
    }

    /// 记录是否在范围内：申领/收货的部门或站点任一命中即可见
    pub fn admits(&self, record: &Requisition) -> bool {
        [record.issuing_department_id, record.delivery_department_id]
            .into_iter()
            .flatten()
            .any(|id| self.contains_department(id))
            || [record.issuing_station_id, record.delivery_station_id]
                .into_iter()
                .flatten()
                .any(|id| self.contains_station(id))
    }

    /// 收窄记录集
    pub fn narrow(&self, records: Vec<Requisition>) -> Vec<Requisition> {
        records.into_iter().filter(|r| self.admits(r)).collect()
    }
}
