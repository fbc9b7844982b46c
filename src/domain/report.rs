// ==========================================
// 物资申领报表 - 聚合结果
// ==========================================
// 职责: 按部门 / 按站点的汇总行与整体报表结果
// 不变量: sum(status_counts) == count
// 说明: 组内不存在的状态不补零（key 缺失即为 0）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 按部门汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub department_id: i64,
    pub department_name: String,
    pub count: u32,
    pub status_counts: BTreeMap<String, u32>,
}

/// 按站点汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    pub station_id: i64,
    pub station_name: String,
    pub count: u32,
    pub status_counts: BTreeMap<String, u32>,
}

impl DepartmentSummary {
    /// 部门名称兜底标签
    pub fn fallback_name(department_id: i64) -> String {
        format!("Department {}", department_id)
    }

    pub fn status_total(&self) -> u32 {
        self.status_counts.values().sum()
    }
}

impl StationSummary {
    /// 站点名称兜底标签
    pub fn fallback_name(station_id: i64) -> String {
        format!("Station {}", station_id)
    }

    pub fn status_total(&self) -> u32 {
        self.status_counts.values().sum()
    }
}

/// 报表结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub by_department: Vec<DepartmentSummary>,
    pub by_station: Vec<StationSummary>,
}

impl ReportResult {
    pub fn is_empty(&self) -> bool {
        self.by_department.is_empty() && self.by_station.is_empty()
    }

    pub fn department(&self, department_id: i64) -> Option<&DepartmentSummary> {
        self.by_department
            .iter()
            .find(|s| s.department_id == department_id)
    }

    pub fn station(&self, station_id: i64) -> Option<&StationSummary> {
        self.by_station.iter().find(|s| s.station_id == station_id)
    }
}
