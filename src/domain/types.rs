// ==========================================
// 物资申领报表 - 领域类型定义
// ==========================================
// 职责: 申领状态、申领类型枚举及其数据库/报表字符串映射
// 约定: 数据库与报表统一使用枚举变体名（PascalCase）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 申领状态 (Requisition Status)
// ==========================================
// 报表 statusCounts 的 key 即为变体名
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RequisitionStatus {
    Draft,           // 草稿
    PendingApproval, // 待审批
    Approved,        // 已审批
    Rejected,        // 已驳回
    InTransit,       // 配送中
    Completed,       // 已完成
    Cancelled,       // 已取消
}

impl RequisitionStatus {
    /// 全部状态（固定顺序，用于状态过滤项）
    pub const ALL: [RequisitionStatus; 7] = [
        RequisitionStatus::Draft,
        RequisitionStatus::PendingApproval,
        RequisitionStatus::Approved,
        RequisitionStatus::Rejected,
        RequisitionStatus::InTransit,
        RequisitionStatus::Completed,
        RequisitionStatus::Cancelled,
    ];

    /// 规范名称（数据库存储值 / 报表 key / 过滤项 value）
    pub fn as_str(&self) -> &'static str {
        match self {
            RequisitionStatus::Draft => "Draft",
            RequisitionStatus::PendingApproval => "PendingApproval",
            RequisitionStatus::Approved => "Approved",
            RequisitionStatus::Rejected => "Rejected",
            RequisitionStatus::InTransit => "InTransit",
            RequisitionStatus::Completed => "Completed",
            RequisitionStatus::Cancelled => "Cancelled",
        }
    }

    /// 从规范名称解析（精确匹配）
    pub fn from_db_str(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }

    /// 国际化标签 key
    pub fn label_key(&self) -> String {
        format!("status.{}", self.as_str())
    }
}

impl fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 申领类型 (Requisition Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RequisitionType {
    Transfer,   // 调拨
    Assignment, // 领用
    Disposal,   // 报废处置
    Return,     // 退库
}

impl RequisitionType {
    pub const ALL: [RequisitionType; 4] = [
        RequisitionType::Transfer,
        RequisitionType::Assignment,
        RequisitionType::Disposal,
        RequisitionType::Return,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequisitionType::Transfer => "Transfer",
            RequisitionType::Assignment => "Assignment",
            RequisitionType::Disposal => "Disposal",
            RequisitionType::Return => "Return",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for RequisitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
