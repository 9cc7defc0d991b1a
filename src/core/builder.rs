//! 组件装配：按依赖顺序显式构建存储、LLM、规划 Agent、网关与工作流
//!
//! 进程启动时调用一次；存储与 Agent 句柄是长生命周期、可跨请求共享的 Arc。

use std::sync::Arc;

use crate::agent::AgentOracle;
use crate::config::AppConfig;
use crate::core::PlanningError;
use crate::inventory::InventoryGateway;
use crate::llm::{LlmClient, MockLlmClient, OpenAiClient};
use crate::planning::PLANNER_INSTRUCTIONS;
use crate::store::{seed, InventoryStore, MemoryStore, SqliteStore, StoreError, WorkOrderSink};
use crate::work_orders::WorkOrderStore;
use crate::workflow::RepairPlanningWorkflow;

/// 规划工作流构建器
pub struct PlannerBuilder {
    config: AppConfig,
}

impl PlannerBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 根据 [oracle] 段选择 LLM 后端
    pub fn create_llm(&self) -> Result<Arc<dyn LlmClient>, PlanningError> {
        let oracle = &self.config.oracle;
        let llm: Arc<dyn LlmClient> = match oracle.provider.to_lowercase().as_str() {
            "openai" => {
                tracing::info!(
                    model = %oracle.model_deployment,
                    endpoint = oracle.endpoint.as_deref().unwrap_or("(default)"),
                    "Using OpenAI-compatible planning model"
                );
                Arc::new(OpenAiClient::new(
                    oracle.endpoint.as_deref().filter(|s| !s.trim().is_empty()),
                    &oracle.model_deployment,
                    oracle.resolved_api_key().as_deref(),
                ))
            }
            "mock" => {
                tracing::warn!("Using Mock planning model");
                Arc::new(MockLlmClient::new())
            }
            other => {
                return Err(PlanningError::Config(format!(
                    "unknown oracle provider '{}'",
                    other
                )))
            }
        };
        Ok(llm)
    }

    /// 按 [store] 段打开存储，返回库存查询与工单写入两个视图
    async fn open_store(
        &self,
    ) -> Result<(Arc<dyn InventoryStore>, Arc<dyn WorkOrderSink>), PlanningError> {
        let store_cfg = &self.config.store;
        let seed_demo = self.config.app.seed_demo_data;

        match store_cfg.backend.to_lowercase().as_str() {
            "memory" => {
                let store = if seed_demo {
                    MemoryStore::with_inventory(seed::demo_technicians(), seed::demo_parts())
                } else {
                    MemoryStore::new()
                };
                tracing::info!("Using in-memory document store");
                let store = Arc::new(store);
                let inventory: Arc<dyn InventoryStore> = store.clone();
                let sink: Arc<dyn WorkOrderSink> = store;
                Ok((inventory, sink))
            }
            "sqlite" => {
                let path = store_cfg.database_path();
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::Unavailable(format!("{}: {}", parent.display(), e))
                    })?;
                }
                let store = SqliteStore::open(&path, store_cfg.max_connections).await?;
                tracing::info!("Using SQLite document store: {:?}", path);

                if seed_demo {
                    seed_sqlite(&store).await?;
                }
                let store = Arc::new(store);
                let inventory: Arc<dyn InventoryStore> = store.clone();
                let sink: Arc<dyn WorkOrderSink> = store;
                Ok((inventory, sink))
            }
            other => Err(PlanningError::Config(format!(
                "unknown store backend '{}'",
                other
            ))),
        }
    }

    /// 构建工作流：存储 → LLM → 规划 Agent → 网关 / 工单存储 → 工作流
    pub async fn build(self) -> Result<RepairPlanningWorkflow, PlanningError> {
        self.config.warn_missing();

        let (inventory_store, work_order_sink) = self.open_store().await?;
        let llm = self.create_llm()?;
        let oracle = Arc::new(AgentOracle::new(llm, PLANNER_INSTRUCTIONS));

        Ok(RepairPlanningWorkflow::new(
            oracle,
            InventoryGateway::new(inventory_store),
            WorkOrderStore::new(work_order_sink),
        ))
    }
}

/// 集合为空时写入演示数据
async fn seed_sqlite(store: &SqliteStore) -> Result<(), StoreError> {
    if store.technician_count().await? == 0 {
        for tech in seed::demo_technicians() {
            store.upsert_technician(&tech).await?;
        }
        tracing::info!("Seeded demo technicians");
    }
    if store.part_count().await? == 0 {
        for part in seed::demo_parts() {
            store.upsert_part(&part).await?;
        }
        tracing::info!("Seeded demo parts inventory");
    }
    Ok(())
}
