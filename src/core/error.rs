//! 规划错误类型
//!
//! 只有「LLM 调用失败」「响应无法解析」「存储故障」「取消」会中止一次规划；
//! 引用不一致（未知技师、未知备件）在调和阶段静默修复，不在此列。

use thiserror::Error;

use crate::store::StoreError;

/// 规划工作流中会中止本次请求的错误
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Planning agent invocation failed: {0}")]
    OracleInvocation(String),

    #[error("Planning agent response unparsable: {reason}")]
    ResponseParse { reason: String, raw: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Planning cancelled")]
    Cancelled,
}

impl PlanningError {
    pub(crate) fn parse(reason: impl Into<String>, raw: &str) -> Self {
        Self::ResponseParse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}
