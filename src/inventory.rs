//! 库存网关：按技能重合度筛选并排序可用技师，按备件号查询库存
//!
//! 存储故障记录日志后原样抛出，不做掩盖。

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::{cancellable, PlanningError};
use crate::domain::{Part, Technician};
use crate::store::InventoryStore;

/// 技能集合的比较键：忽略大小写与首尾空白
fn skill_key(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// 计算 match_score、丢弃零分、按分数降序 / 姓名升序排序
pub fn rank_technicians(candidates: Vec<Technician>, required_skills: &[String]) -> Vec<Technician> {
    let required: HashSet<String> = required_skills
        .iter()
        .map(|s| skill_key(s))
        .filter(|s| !s.is_empty())
        .collect();
    if required.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<Technician> = candidates
        .into_iter()
        .filter_map(|mut tech| {
            let own: HashSet<String> = tech.skills.iter().map(|s| skill_key(s)).collect();
            tech.match_score = own.intersection(&required).count();
            (tech.match_score > 0).then_some(tech)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// 库存网关
pub struct InventoryGateway {
    store: Arc<dyn InventoryStore>,
}

impl InventoryGateway {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// 可用且至少具备一项所需技能的技师；所需技能为空时直接返回空
    pub async fn find_available_technicians(
        &self,
        required_skills: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Technician>, PlanningError> {
        if required_skills.iter().all(|s| s.trim().is_empty()) {
            tracing::debug!("No required skills, skipping technician lookup");
            return Ok(Vec::new());
        }

        let candidates = cancellable(cancel, async {
            self.store.available_technicians().await.map_err(|e| {
                tracing::error!("Technician query failed: {}", e);
                PlanningError::from(e)
            })
        })
        .await?;

        let total = candidates.len();
        let ranked = rank_technicians(candidates, required_skills);
        tracing::info!(
            available = total,
            qualified = ranked.len(),
            "Technician lookup complete"
        );
        Ok(ranked)
    }

    /// part_number 精确匹配的备件；查不到的编号静默忽略
    pub async fn find_parts(
        &self,
        part_numbers: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Part>, PlanningError> {
        let mut requested: Vec<String> = Vec::with_capacity(part_numbers.len());
        for number in part_numbers {
            if !number.is_empty() && !requested.contains(number) {
                requested.push(number.clone());
            }
        }
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let parts = cancellable(cancel, async {
            self.store.parts_by_number(&requested).await.map_err(|e| {
                tracing::error!("Parts query failed: {}", e);
                PlanningError::from(e)
            })
        })
        .await?;

        if parts.len() < requested.len() {
            let missing: Vec<&String> = requested
                .iter()
                .filter(|n| !parts.iter().any(|p| &p.part_number == *n))
                .collect();
            tracing::info!(?missing, "Some requested part numbers are not stocked");
        }
        Ok(parts)
    }
}
