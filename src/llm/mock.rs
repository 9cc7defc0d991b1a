//! Mock LLM 客户端（用于测试与离线演示，无需 API）
//!
//! 按顺序返回预设回复；预设用完后返回一份固定的维修计划 JSON。
//! 可配置为总是失败，用于模拟 LLM 不可用。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, Message};

/// 预设回复用完后的固定计划（不指派技师、不含备件，交由调和阶段补齐）
const CANNED_PLAN: &str = r#"{
  "title": "Inspect and repair reported fault",
  "description": "Isolate the machine, inspect the affected assembly and replace worn components.",
  "type": "corrective",
  "priority": "high",
  "assignedTo": null,
  "notes": "Generated offline by the mock planning client.",
  "estimatedDuration": 120,
  "partsUsed": [],
  "tasks": [
    {
      "sequence": 1,
      "title": "Lockout / tagout",
      "description": "Isolate electrical, hydraulic and pneumatic energy sources.",
      "estimatedDurationMinutes": 15,
      "requiredSkills": [],
      "safetyNotes": "Verify zero energy state before opening guards."
    },
    {
      "sequence": 2,
      "title": "Diagnose and repair",
      "description": "Inspect the assembly, replace failed components and verify operation.",
      "estimatedDurationMinutes": 105,
      "requiredSkills": []
    }
  ]
}"#;

/// Mock 客户端：记录收到的消息，按脚本回复
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<String>>,
    failure: Option<String>,
    received: Mutex<Vec<Vec<Message>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 依次返回给定回复
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// 每次调用都返回错误
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// 已收到的调用次数
    pub fn call_count(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// 最近一次调用收到的消息
    pub fn last_messages(&self) -> Option<Vec<Message>> {
        self.received.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        if let Ok(mut received) = self.received.lock() {
            received.push(messages.to_vec());
        }

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let scripted = self
            .responses
            .lock()
            .map_err(|e| e.to_string())?
            .pop_front();
        Ok(scripted.unwrap_or_else(|| CANNED_PLAN.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_then_canned() {
        let client = MockLlmClient::with_responses(["first"]);
        let messages = vec![Message::user("plan")];
        assert_eq!(client.complete(&messages).await.unwrap(), "first");
        let canned = client.complete(&messages).await.unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&canned).is_ok());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_records_call() {
        let client = MockLlmClient::failing("quota exceeded");
        let err = client.complete(&[Message::user("plan")]).await.unwrap_err();
        assert_eq!(err, "quota exceeded");
        assert_eq!(client.call_count(), 1);
    }
}
