//! 内存文档存储（测试与无数据库演示）

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{InventoryStore, StoreError, WorkOrderSink};
use crate::domain::{Part, Technician, WorkOrder};

/// 内存存储：三个集合各用一把 RwLock；work_orders 以 (partition, id) 为键
#[derive(Default)]
pub struct MemoryStore {
    technicians: RwLock<Vec<Technician>>,
    parts: RwLock<Vec<Part>>,
    work_orders: RwLock<HashMap<(String, String), WorkOrder>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(technicians: Vec<Technician>, parts: Vec<Part>) -> Self {
        Self {
            technicians: RwLock::new(technicians),
            parts: RwLock::new(parts),
            work_orders: RwLock::new(HashMap::new()),
        }
    }

    /// 按 id 覆盖或追加技师
    pub async fn upsert_technician(&self, technician: Technician) {
        let mut technicians = self.technicians.write().await;
        match technicians.iter_mut().find(|t| t.id == technician.id) {
            Some(existing) => *existing = technician,
            None => technicians.push(technician),
        }
    }

    pub async fn work_order_count(&self) -> usize {
        self.work_orders.read().await.len()
    }

    /// 某分区内的工单
    pub async fn work_orders_in_partition(&self, partition_key: &str) -> Vec<WorkOrder> {
        self.work_orders
            .read()
            .await
            .iter()
            .filter(|((partition, _), _)| partition == partition_key)
            .map(|(_, order)| order.clone())
            .collect()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn available_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        Ok(self
            .technicians
            .read()
            .await
            .iter()
            .filter(|t| t.available)
            .cloned()
            .collect())
    }

    async fn parts_by_number(&self, part_numbers: &[String]) -> Result<Vec<Part>, StoreError> {
        Ok(self
            .parts
            .read()
            .await
            .iter()
            .filter(|p| part_numbers.iter().any(|n| n == &p.part_number))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkOrderSink for MemoryStore {
    async fn insert_work_order(
        &self,
        partition_key: &str,
        work_order: &WorkOrder,
    ) -> Result<WorkOrder, StoreError> {
        let key = (partition_key.to_string(), work_order.id.clone());
        let mut orders = self.work_orders.write().await;
        if orders.contains_key(&key) {
            return Err(StoreError::Conflict(work_order.id.clone()));
        }
        orders.insert(key, work_order.clone());
        Ok(work_order.clone())
    }
}
