//! 计划调和层：prompt 组装、不可信草稿解析、调和为领域工单

pub mod draft;
pub mod prompt;
pub mod reconciler;

use crate::domain::{DiagnosedFault, Part, Technician};

pub use draft::{parse_draft, WorkOrderDraft};
pub use prompt::{build_planning_prompt, PLANNER_INSTRUCTIONS};
pub use reconciler::{reconcile, work_order_number_at, PlanReconciler, WORK_ORDER_NUMBER_PREFIX};

/// 单次规划请求的全部上下文（故障 + 查询到的库存快照）
#[derive(Debug, Clone)]
pub struct PlanningRequest {
    pub fault: DiagnosedFault,
    pub required_skills: Vec<String>,
    pub required_parts: Vec<String>,
    /// 已按 match_score 排序的可用技师
    pub technicians: Vec<Technician>,
    pub parts: Vec<Part>,
}
