//! 维修规划工作流：故障 → 映射 → 库存查询 → 计划调和 → 工单落库
//!
//! 每个故障一次线性流程；任何阶段出错即整体失败，不留部分状态。

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::agent::{AgentVersion, PlanningOracle};
use crate::core::PlanningError;
use crate::domain::{DiagnosedFault, WorkOrder};
use crate::inventory::InventoryGateway;
use crate::mapping;
use crate::planning::{PlanReconciler, PlanningRequest};
use crate::work_orders::WorkOrderStore;

pub struct RepairPlanningWorkflow {
    oracle: Arc<dyn PlanningOracle>,
    inventory: InventoryGateway,
    reconciler: PlanReconciler,
    work_orders: WorkOrderStore,
}

impl RepairPlanningWorkflow {
    pub fn new(
        oracle: Arc<dyn PlanningOracle>,
        inventory: InventoryGateway,
        work_orders: WorkOrderStore,
    ) -> Self {
        Self {
            reconciler: PlanReconciler::new(oracle.clone()),
            oracle,
            inventory,
            work_orders,
        }
    }

    /// 确保规划 Agent 已建版本（幂等）
    pub async fn prepare(&self) -> Result<AgentVersion, PlanningError> {
        self.oracle.ensure_version().await.map_err(|e| {
            tracing::error!("Planning agent provisioning failed: {}", e);
            PlanningError::OracleInvocation(e)
        })
    }

    /// 为单个故障生成并落库工单
    pub async fn plan_repair(
        &self,
        fault: DiagnosedFault,
        cancel: &CancellationToken,
    ) -> Result<WorkOrder, PlanningError> {
        tracing::info!(
            fault_type = %fault.fault_type,
            machine = %fault.machine_id,
            "Planning repair"
        );

        let required_skills = mapping::required_skills(&fault.fault_type);
        let required_parts = mapping::required_parts(&fault.fault_type);
        if required_skills.is_empty() && required_parts.is_empty() {
            tracing::warn!(fault_type = %fault.fault_type, "Fault type not in mapping table");
        }

        let (technicians, parts) = tokio::try_join!(
            self.inventory.find_available_technicians(&required_skills, cancel),
            self.inventory.find_parts(&required_parts, cancel),
        )?;
        tracing::info!(
            technicians = technicians.len(),
            parts = parts.len(),
            "Inventory context ready"
        );

        let request = PlanningRequest {
            fault,
            required_skills,
            required_parts,
            technicians,
            parts,
        };
        let work_order = self.reconciler.plan(&request, cancel).await?;
        self.work_orders.create(work_order, cancel).await
    }
}
