//! 文档存储边界
//!
//! 三个逻辑集合：Technicians（按可用性过滤）、PartsInventory（按备件号集合过滤）、
//! WorkOrders（本核心只写，按 status 分区）。提供内存与 SQLite 两种实现。

pub mod memory;
pub mod seed;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Part, Technician, WorkOrder};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// 存储故障：原样向上抛出，不做本地重试
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate document id: {0}")]
    Conflict(String),
}

/// 库存查询接口（技师、备件）
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// 所有 available = true 的技师
    async fn available_technicians(&self) -> Result<Vec<Technician>, StoreError>;

    /// part_number 与给定集合精确匹配（区分大小写）的备件
    async fn parts_by_number(&self, part_numbers: &[String]) -> Result<Vec<Part>, StoreError>;
}

/// 工单写入接口
#[async_trait]
pub trait WorkOrderSink: Send + Sync {
    /// 以 partition_key 分区写入新工单，返回存储后的表示
    async fn insert_work_order(
        &self,
        partition_key: &str,
        work_order: &WorkOrder,
    ) -> Result<WorkOrder, StoreError>;
}
