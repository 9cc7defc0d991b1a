use serde::{Deserialize, Serialize};

/// 备件库存快照（单次规划请求内只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: String,
    pub part_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity_available: i64,
}

impl Part {
    pub fn new(
        id: impl Into<String>,
        part_number: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        quantity_available: i64,
    ) -> Self {
        Self {
            id: id.into(),
            part_number: part_number.into(),
            description: description.into(),
            category: category.into(),
            quantity_available,
        }
    }
}
