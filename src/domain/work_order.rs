//! 工单：调和完成、可落库的维修计划

use serde::{Deserialize, Serialize};

/// 工单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkOrderType {
    #[default]
    Corrective,
    Preventive,
    Emergency,
}

impl WorkOrderType {
    /// 忽略大小写与首尾空白解析；未知值返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "corrective" => Some(Self::Corrective),
            "preventive" => Some(Self::Preventive),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corrective => "corrective",
            Self::Preventive => "preventive",
            Self::Emergency => "emergency",
        }
    }
}

/// 工单优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// 工单备件行：按 part_number 引用库存备件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderPartUsage {
    pub part_id: String,
    pub part_number: String,
    pub quantity: i64,
}

/// 维修步骤；sequence 决定执行顺序（允许间隔与重复）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairTask {
    pub sequence: i64,
    pub title: String,
    pub description: String,
    pub estimated_duration_minutes: i64,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_notes: Option<String>,
}

/// 工单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub work_order_number: String,
    pub machine_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub order_type: WorkOrderType,
    pub priority: Priority,
    pub status: String,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub notes: String,
    /// 预计总工时（分钟）
    pub estimated_duration: i64,
    #[serde(default)]
    pub parts_used: Vec<WorkOrderPartUsage>,
    #[serde(default)]
    pub tasks: Vec<RepairTask>,
}

/// 新工单的默认状态
pub const DEFAULT_STATUS: &str = "open";
