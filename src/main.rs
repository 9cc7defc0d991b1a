//! Repair Planner 演示入口
//!
//! 初始化日志与配置，装配组件，对一个示例故障跑完整流程；成功打印工单标识，失败返回非零退出码。

use std::sync::Arc;

use anyhow::Context;
use repair_planner::config::load_config;
use repair_planner::core::ShutdownManager;
use repair_planner::{observability, DiagnosedFault, PlannerBuilder};

fn sample_fault() -> DiagnosedFault {
    DiagnosedFault::new(
        "curing_temperature_excessive",
        "machine-001",
        "Curing press platen temperature reached 182C against a 170C setpoint during cycle 4412",
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load configuration")?;

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();

    let workflow = PlannerBuilder::new(cfg)
        .build()
        .await
        .context("Failed to build planning workflow")?;

    let fault = sample_fault();
    let result = async {
        workflow.prepare().await?;
        workflow.plan_repair(fault, &shutdown.token()).await
    }
    .await;

    match result {
        Ok(order) => {
            tracing::info!(
                id = %order.id,
                number = %order.work_order_number,
                assigned_to = order.assigned_to.as_deref().unwrap_or("(unassigned)"),
                tasks = order.tasks.len(),
                parts = order.parts_used.len(),
                "Repair plan persisted"
            );
            println!("{}\t{}", order.work_order_number, order.id);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Repair planning failed: {}", e);
            Err(e).context("Repair planning failed")
        }
    }
}
