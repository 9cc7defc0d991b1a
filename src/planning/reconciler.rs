//! 计划调和器
//!
//! 线性状态机：组装 prompt → 调用规划 Agent → 解析草稿 → 补默认值 → 校验指派 → 过滤备件 → 排序步骤。
//! 只有 Agent 调用失败、响应无法解析、取消三种情况会中止；引用不一致一律就地修复。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::agent::PlanningOracle;
use crate::core::{cancellable, PlanningError};
use crate::domain::work_order::DEFAULT_STATUS;
use crate::domain::{Priority, RepairTask, WorkOrder, WorkOrderPartUsage, WorkOrderType};
use crate::planning::draft::{parse_draft, PartUsageDraft, TaskDraft, WorkOrderDraft};
use crate::planning::prompt::build_planning_prompt;
use crate::planning::PlanningRequest;

/// 生成工单号时使用的前缀
pub const WORK_ORDER_NUMBER_PREFIX: &str = "WO-";

/// 非空白则返回去掉首尾空白后的值
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 工单号：前缀 + UTC 时间戳（无分隔符，精确到秒）
pub fn work_order_number_at(now: DateTime<Utc>) -> String {
    format!("{}{}", WORK_ORDER_NUMBER_PREFIX, now.format("%Y%m%d%H%M%S"))
}

/// 计划调和器：持有规划 Agent
pub struct PlanReconciler {
    oracle: Arc<dyn PlanningOracle>,
}

impl PlanReconciler {
    pub fn new(oracle: Arc<dyn PlanningOracle>) -> Self {
        Self { oracle }
    }

    /// 生成并调和一份工单（尚未落库）
    pub async fn plan(
        &self,
        request: &PlanningRequest,
        cancel: &CancellationToken,
    ) -> Result<WorkOrder, PlanningError> {
        let prompt = build_planning_prompt(request);
        tracing::debug!(chars = prompt.len(), "Planning prompt assembled");

        let response = cancellable(cancel, async {
            self.oracle.invoke(&prompt).await.map_err(|e| {
                tracing::error!("Planning agent invocation failed: {}", e);
                PlanningError::OracleInvocation(e)
            })
        })
        .await?;

        let draft = parse_draft(&response).map_err(|e| {
            tracing::error!("Planning agent response unparsable: {}", e);
            e
        })?;

        Ok(reconcile(draft, request, Utc::now()))
    }
}

/// 将不可信草稿调和为领域工单；纯函数，不会失败
pub fn reconcile(draft: WorkOrderDraft, request: &PlanningRequest, now: DateTime<Utc>) -> WorkOrder {
    let fault = &request.fault;

    let id = non_blank(draft.id).unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let work_order_number =
        non_blank(draft.work_order_number).unwrap_or_else(|| work_order_number_at(now));
    let machine_id = non_blank(draft.machine_id).unwrap_or_else(|| fault.machine_id.clone());
    let status = non_blank(draft.status).unwrap_or_else(|| DEFAULT_STATUS.to_string());
    let title = non_blank(draft.title)
        .unwrap_or_else(|| format!("Repair {} on {}", fault.fault_type, machine_id));
    let description = non_blank(draft.description).unwrap_or_else(|| fault.description.clone());

    let order_type = match non_blank(draft.order_type) {
        Some(raw) => WorkOrderType::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(value = %raw, "Unknown work order type from planner, using corrective");
            WorkOrderType::default()
        }),
        None => WorkOrderType::default(),
    };
    let priority = match non_blank(draft.priority) {
        Some(raw) => Priority::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(value = %raw, "Unknown priority from planner, using medium");
            Priority::default()
        }),
        None => Priority::default(),
    };

    let assigned_to = resolve_assignee(non_blank(draft.assigned_to), request);
    let parts_used = filter_parts(draft.parts_used.unwrap_or_default(), request);
    let tasks = order_tasks(draft.tasks.unwrap_or_default());

    let estimated_duration = draft
        .estimated_duration
        .unwrap_or_else(|| {
            tasks
                .iter()
                .fold(0i64, |acc, t| acc.saturating_add(t.estimated_duration_minutes))
        })
        .max(0);

    WorkOrder {
        id,
        work_order_number,
        machine_id,
        title,
        description,
        order_type,
        priority,
        status,
        assigned_to,
        notes: draft.notes.unwrap_or_default(),
        estimated_duration,
        parts_used,
        tasks,
    }
}

/// 指派校验：提议的技师须在可用列表中（忽略大小写），否则改派排名第一的技师
fn resolve_assignee(proposed: Option<String>, request: &PlanningRequest) -> Option<String> {
    let fallback = request.technicians.first().map(|t| t.id.clone());

    let Some(proposed) = proposed else {
        return fallback;
    };

    let wanted = proposed.to_lowercase();
    match request
        .technicians
        .iter()
        .find(|t| t.id.to_lowercase() == wanted)
    {
        Some(tech) => Some(tech.id.clone()),
        None => {
            tracing::warn!(
                proposed = %proposed,
                replacement = ?fallback,
                "Planner assigned a technician outside the available set, reassigning"
            );
            fallback
        }
    }
}

/// 备件过滤：只保留库存中存在的备件号（忽略大小写），其余丢弃
fn filter_parts(proposed: Vec<PartUsageDraft>, request: &PlanningRequest) -> Vec<WorkOrderPartUsage> {
    let mut kept = Vec::with_capacity(proposed.len());
    for usage in proposed {
        let Some(number) = non_blank(usage.part_number) else {
            tracing::warn!("Planner proposed a part without partNumber, dropping");
            continue;
        };
        let Some(stocked) = request
            .parts
            .iter()
            .find(|p| p.part_number.to_lowercase() == number.to_lowercase())
        else {
            tracing::warn!(part_number = %number, "Planner proposed a part not in inventory, dropping");
            continue;
        };
        kept.push(WorkOrderPartUsage {
            part_id: non_blank(usage.part_id).unwrap_or_else(|| stocked.id.clone()),
            part_number: stocked.part_number.clone(),
            // 数量至少为 1
            quantity: usage.quantity.unwrap_or(1).max(1),
        });
    }
    kept
}

/// 步骤排序：按 sequence 升序稳定排序，不重新编号
fn order_tasks(proposed: Vec<TaskDraft>) -> Vec<RepairTask> {
    let mut tasks: Vec<RepairTask> = proposed
        .into_iter()
        .map(|t| RepairTask {
            sequence: t.sequence.unwrap_or(0),
            title: t.title.unwrap_or_default(),
            description: t.description.unwrap_or_default(),
            estimated_duration_minutes: t.estimated_duration_minutes.unwrap_or(0).max(0),
            required_skills: t.required_skills.unwrap_or_default(),
            safety_notes: non_blank(t.safety_notes),
        })
        .collect();
    tasks.sort_by_key(|t| t.sequence);
    tasks
}
