use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 外部故障诊断流程产出的故障描述，每次规划请求消费一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosedFault {
    pub fault_type: String,
    pub machine_id: String,
    pub description: String,
    pub detected_at: DateTime<Utc>,
}

impl DiagnosedFault {
    pub fn new(
        fault_type: impl Into<String>,
        machine_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            fault_type: fault_type.into(),
            machine_id: machine_id.into(),
            description: description.into(),
            detected_at: Utc::now(),
        }
    }
}
