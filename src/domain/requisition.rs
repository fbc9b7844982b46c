// ==========================================
// 物资申领报表 - 申领记录实体
// ==========================================
// 职责: 报表聚合的基本单元（只读）
// 约定: 部门/站点 ID 可为空，空值表示"未分配"
// ==========================================

use crate::domain::types::{RequisitionStatus, RequisitionType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// "未分配" 部门/站点的分组哨兵值
pub const UNASSIGNED_ID: i64 = 0;

/// 申领记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requisition {
    /// 申领单主键
    pub requisition_id: i64,

    /// 申领单号（如 RQ-2026-000123）
    pub requisition_no: String,

    /// 申领部门
    pub issuing_department_id: Option<i64>,

    /// 申领站点
    pub issuing_station_id: Option<i64>,

    /// 收货部门
    pub delivery_department_id: Option<i64>,

    /// 收货站点
    pub delivery_station_id: Option<i64>,

    /// 申领状态
    pub status: RequisitionStatus,

    /// 申领类型
    pub requisition_type: RequisitionType,

    /// 创建人（工号）
    pub created_by: String,

    /// 创建时间
    pub created_at: NaiveDateTime,

    /// 备注
    pub remarks: Option<String>,
}

impl Requisition {
    /// 部门维度分组 key（按申领部门，空值归入哨兵组）
    pub fn department_key(&self) -> i64 {
        self.issuing_department_id.unwrap_or(UNASSIGNED_ID)
    }

    /// 站点维度分组 key（按收货站点，空值归入哨兵组）
    pub fn station_key(&self) -> i64 {
        self.delivery_station_id.unwrap_or(UNASSIGNED_ID)
    }

    /// 申领或收货部门是否命中
    pub fn touches_department(&self, department_id: i64) -> bool {
        self.issuing_department_id == Some(department_id)
            || self.delivery_department_id == Some(department_id)
    }

    /// 申领或收货站点是否命中
    pub fn touches_station(&self, station_id: i64) -> bool {
        self.issuing_station_id == Some(station_id) || self.delivery_station_id == Some(station_id)
    }
}
