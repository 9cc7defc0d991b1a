//! 工单存储：补齐 id / status 后按状态分区写入

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::PlanningError;
use crate::domain::work_order::DEFAULT_STATUS;
use crate::domain::WorkOrder;
use crate::store::WorkOrderSink;

pub struct WorkOrderStore {
    sink: Arc<dyn WorkOrderSink>,
}

impl WorkOrderStore {
    pub fn new(sink: Arc<dyn WorkOrderSink>) -> Self {
        Self { sink }
    }

    /// 写入新工单并返回存储后的表示；存储故障记录日志后原样抛出
    pub async fn create(
        &self,
        mut work_order: WorkOrder,
        cancel: &CancellationToken,
    ) -> Result<WorkOrder, PlanningError> {
        if work_order.id.trim().is_empty() {
            work_order.id = uuid::Uuid::new_v4().to_string();
        }
        if work_order.status.trim().is_empty() {
            work_order.status = DEFAULT_STATUS.to_string();
        }

        // 写入即提交点：写入前检查取消，开始写入后不再中途放弃
        if cancel.is_cancelled() {
            tracing::info!(id = %work_order.id, "Work order write skipped, request cancelled");
            return Err(PlanningError::Cancelled);
        }

        let partition_key = work_order.status.clone();
        let stored = self
            .sink
            .insert_work_order(&partition_key, &work_order)
            .await
            .map_err(|e| {
                tracing::error!(id = %work_order.id, "Work order write failed: {}", e);
                PlanningError::from(e)
            })?;

        tracing::info!(
            id = %stored.id,
            number = %stored.work_order_number,
            partition = %partition_key,
            "Work order created"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, WorkOrderType};
    use crate::store::{MemoryStore, SqliteStore, StoreError};
    use async_trait::async_trait;

    fn blank_order() -> WorkOrder {
        WorkOrder {
            id: String::new(),
            work_order_number: "WO-20250101000000".into(),
            machine_id: "machine-001".into(),
            title: "t".into(),
            description: "d".into(),
            order_type: WorkOrderType::Corrective,
            priority: Priority::Low,
            status: " ".into(),
            assigned_to: None,
            notes: String::new(),
            estimated_duration: 10,
            parts_used: vec![],
            tasks: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_status() {
        let sink = Arc::new(MemoryStore::new());
        let store = WorkOrderStore::new(sink.clone());
        let stored = store
            .create(blank_order(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(!stored.id.is_empty());
        assert_eq!(stored.status, "open");
        assert_eq!(stored.work_order_number, "WO-20250101000000");
        let open = sink.work_orders_in_partition("open").await;
        assert_eq!(open, vec![stored]);
    }

    #[tokio::test]
    async fn test_partition_follows_status() {
        let sink = Arc::new(MemoryStore::new());
        let store = WorkOrderStore::new(sink.clone());
        let mut order = blank_order();
        order.status = "scheduled".into();
        order.id = "wo-1".into();
        store.create(order, &CancellationToken::new()).await.unwrap();

        assert_eq!(sink.work_orders_in_partition("scheduled").await.len(), 1);
        assert!(sink.work_orders_in_partition("open").await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_reraised() {
        struct ReadOnly;

        #[async_trait]
        impl WorkOrderSink for ReadOnly {
            async fn insert_work_order(&self, _: &str, _: &WorkOrder) -> Result<WorkOrder, StoreError> {
                Err(StoreError::Unavailable("read-only replica".into()))
            }
        }

        let store = WorkOrderStore::new(Arc::new(ReadOnly));
        let err = store
            .create(blank_order(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::Storage(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_cancelled_write_persists_nothing() {
        let sink = Arc::new(MemoryStore::new());
        let store = WorkOrderStore::new(sink.clone());
        let token = CancellationToken::new();
        token.cancel();
        let err = store.create(blank_order(), &token).await.unwrap_err();
        assert!(matches!(err, PlanningError::Cancelled));
        assert_eq!(sink.work_order_count().await, 0);
    }

    #[tokio::test]
    async fn test_cancel_during_sqlite_write_is_all_or_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = Arc::new(SqliteStore::open(dir.path().join("factory.db"), 2).await.unwrap());
        let store = WorkOrderStore::new(sink.clone());

        let mut persisted_ids = Vec::new();
        for i in 0..40 {
            let mut order = blank_order();
            order.id = format!("wo-{i}");
            let token = CancellationToken::new();
            let canceller = token.clone();
            let delay = i % 8;
            let handle = tokio::spawn(async move {
                for _ in 0..delay {
                    tokio::task::yield_now().await;
                }
                canceller.cancel();
            });

            match store.create(order, &token).await {
                Ok(stored) => persisted_ids.push(stored.id),
                Err(PlanningError::Cancelled) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
            handle.await.unwrap();
        }

        let mut rows: Vec<String> = sink
            .work_orders_by_status("open")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        rows.sort();
        persisted_ids.sort();
        assert_eq!(rows, persisted_ids);
    }
}
