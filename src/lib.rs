//! Repair Planner - 故障维修规划工作流
//!
//! 模块划分：
//! - **agent**: 规划 Agent 边界（确保版本 + 调用）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、取消与关闭、组件装配
//! - **domain**: 故障、技师、备件、工单
//! - **inventory**: 库存网关（技师排序、备件查询）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **mapping**: 故障类型 → 技能 / 备件映射
//! - **observability**: 日志初始化
//! - **planning**: prompt 组装、草稿解析、计划调和
//! - **store**: 文档存储（内存 / SQLite）
//! - **work_orders**: 工单落库
//! - **workflow**: 单个故障的端到端流程

pub mod agent;
pub mod config;
pub mod core;
pub mod domain;
pub mod inventory;
pub mod llm;
pub mod mapping;
pub mod observability;
pub mod planning;
pub mod store;
pub mod work_orders;
pub mod workflow;

pub use crate::core::{PlannerBuilder, PlanningError};
pub use domain::{DiagnosedFault, WorkOrder};
pub use workflow::RepairPlanningWorkflow;
