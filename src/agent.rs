//! 规划 Agent 边界
//!
//! 规划 Agent 是一个有状态的外部智能体：固定逻辑名 + 模型部署名 + 固定指令块。
//! 首次使用前须「确保版本」（幂等），之后的规划调用复用同一版本。
//! `AgentOracle` 在任意 `LlmClient` 之上实现该契约：指令块作为 system 消息，prompt 作为 user 消息。

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use crate::llm::{LlmClient, Message};

/// 规划 Agent 的固定逻辑名
pub const PLANNER_AGENT_NAME: &str = "RepairPlannerAgent";

/// 已确保的 Agent 版本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentVersion {
    pub name: String,
    pub model: String,
    /// 由名称、模型与指令块计算出的版本指纹；定义不变则版本不变
    pub version: String,
}

/// 规划 Agent 契约：ensure_version 幂等，invoke 发送单个 prompt 并取回整段文本
#[async_trait]
pub trait PlanningOracle: Send + Sync {
    async fn ensure_version(&self) -> Result<AgentVersion, String>;

    async fn invoke(&self, prompt: &str) -> Result<String, String>;
}

/// 基于 LlmClient 的规划 Agent
pub struct AgentOracle {
    llm: Arc<dyn LlmClient>,
    name: String,
    instructions: String,
    version: OnceCell<AgentVersion>,
}

impl AgentOracle {
    pub fn new(llm: Arc<dyn LlmClient>, instructions: impl Into<String>) -> Self {
        Self {
            llm,
            name: PLANNER_AGENT_NAME.to_string(),
            instructions: instructions.into(),
            version: OnceCell::new(),
        }
    }

    fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.llm.model().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.instructions.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..12].to_string()
    }
}

#[async_trait]
impl PlanningOracle for AgentOracle {
    async fn ensure_version(&self) -> Result<AgentVersion, String> {
        let version = self
            .version
            .get_or_try_init(|| async {
                let model = self.llm.model().trim().to_string();
                if model.is_empty() {
                    return Err(format!(
                        "agent '{}' has no model deployment configured",
                        self.name
                    ));
                }
                let version = AgentVersion {
                    name: self.name.clone(),
                    model,
                    version: self.fingerprint(),
                };
                tracing::info!(
                    agent = %version.name,
                    model = %version.model,
                    version = %version.version,
                    "Planning agent version ensured"
                );
                Ok(version)
            })
            .await?;
        Ok(version.clone())
    }

    async fn invoke(&self, prompt: &str) -> Result<String, String> {
        let version = self.ensure_version().await?;
        tracing::debug!(agent = %version.name, version = %version.version, "Invoking planning agent");

        let messages = vec![
            Message::system(self.instructions.clone()),
            Message::user(prompt.to_string()),
        ];
        let response = self.llm.complete(&messages).await?;

        let (prompt_tokens, completion_tokens, _) = self.llm.token_usage();
        tracing::debug!(prompt_tokens, completion_tokens, "Planning agent token usage (cumulative)");
        Ok(response)
    }
}
