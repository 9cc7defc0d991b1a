//! SQLite 文档存储（sqlx，完全异步）
//!
//! 每个集合一张表：可过滤的字段单独成列，整份文档以 JSON 存于 body 列。
//! work_orders 以 (status, id) 为主键并对 status 建索引，对应按状态分区。

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row, Sqlite};

use super::{InventoryStore, StoreError, WorkOrderSink};
use crate::domain::{Part, Technician, WorkOrder};

/// SQLite 存储
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// 打开（不存在则创建）数据库文件并建表
    pub async fn open(db_path: impl AsRef<Path>, max_connections: u32) -> Result<Self, StoreError> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path.as_ref().display());

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(&db_url)
            .await?;

        let store = Self { pool };
        store.init_tables().await?;
        Ok(store)
    }

    async fn init_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS technicians (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                available INTEGER NOT NULL,
                body TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS parts_inventory (
                id TEXT PRIMARY KEY,
                part_number TEXT NOT NULL,
                body TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS work_orders (
                id TEXT NOT NULL,
                status TEXT NOT NULL,
                work_order_number TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (status, id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_technicians_available ON technicians(available)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_parts_part_number ON parts_inventory(part_number)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_work_orders_status ON work_orders(status)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn upsert_technician(&self, technician: &Technician) -> Result<(), StoreError> {
        let body = serde_json::to_string(technician)?;
        sqlx::query(
            "INSERT OR REPLACE INTO technicians (id, name, available, body) VALUES (?, ?, ?, ?)",
        )
        .bind(&technician.id)
        .bind(&technician.name)
        .bind(technician.available)
        .bind(&body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn upsert_part(&self, part: &Part) -> Result<(), StoreError> {
        let body = serde_json::to_string(part)?;
        sqlx::query("INSERT OR REPLACE INTO parts_inventory (id, part_number, body) VALUES (?, ?, ?)")
            .bind(&part.id)
            .bind(&part.part_number)
            .bind(&body)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn technician_count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM technicians")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    pub async fn part_count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM parts_inventory")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// 某状态分区内的工单，按写入时间排序
    pub async fn work_orders_by_status(&self, status: &str) -> Result<Vec<WorkOrder>, StoreError> {
        let rows = sqlx::query(
            "SELECT body FROM work_orders WHERE status = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let body: String = row.get("body");
                serde_json::from_str(&body).map_err(StoreError::from)
            })
            .collect()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn available_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        let rows = sqlx::query("SELECT body FROM technicians WHERE available = 1")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let body: String = row.get("body");
                serde_json::from_str(&body).map_err(StoreError::from)
            })
            .collect()
    }

    async fn parts_by_number(&self, part_numbers: &[String]) -> Result<Vec<Part>, StoreError> {
        if part_numbers.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT body FROM parts_inventory WHERE part_number IN (");
        let mut separated = query.separated(", ");
        for number in part_numbers {
            separated.push_bind(number.as_str());
        }
        separated.push_unseparated(") ORDER BY part_number ASC");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| {
                let body: String = row.get("body");
                serde_json::from_str(&body).map_err(StoreError::from)
            })
            .collect()
    }
}

#[async_trait]
impl WorkOrderSink for SqliteStore {
    async fn insert_work_order(
        &self,
        partition_key: &str,
        work_order: &WorkOrder,
    ) -> Result<WorkOrder, StoreError> {
        let body = serde_json::to_string(work_order)?;
        let now = chrono::Utc::now().to_rfc3339();

        // 插入与回读同一事务；事务未提交即被丢弃时自动回滚
        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query(
            "INSERT INTO work_orders (id, status, work_order_number, body, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&work_order.id)
        .bind(partition_key)
        .bind(&work_order.work_order_number)
        .bind(&body)
        .bind(&now)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(StoreError::Conflict(work_order.id.clone()));
            }
            Err(e) => return Err(e.into()),
        }

        let row = sqlx::query("SELECT body FROM work_orders WHERE status = ? AND id = ?")
            .bind(partition_key)
            .bind(&work_order.id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        let stored: String = row.get("body");
        Ok(serde_json::from_str(&stored)?)
    }
}
