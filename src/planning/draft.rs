//! 不可信草稿：LLM 返回的工单 JSON
//!
//! 解析是宽松的：
//! - 允许 ```json 代码块或前后夹杂文字，取其中的 JSON 对象
//! - 字段名忽略大小写、下划线与连字符（workOrderNumber / work_order_number / WORKORDERNUMBER）
//! - 数值字段接受数字或数字字符串，带小数时四舍五入到整数分钟
//! - 文本字段接受字符串、数字或布尔；requiredSkills 接受数组或逗号分隔字符串
//!
//! JSON 本身损坏或结构不符（如 tasks 不是数组）时返回 `PlanningError::ResponseParse`。

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::PlanningError;

/// LLM 提议的工单草稿；所有字段均可缺失
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkOrderDraft {
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(rename = "workordernumber", deserialize_with = "lenient_text")]
    pub work_order_number: Option<String>,
    #[serde(rename = "machineid", deserialize_with = "lenient_text")]
    pub machine_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub order_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(rename = "assignedto", deserialize_with = "lenient_text")]
    pub assigned_to: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(rename = "estimatedduration", deserialize_with = "lenient_minutes")]
    pub estimated_duration: Option<i64>,
    #[serde(rename = "partsused")]
    pub parts_used: Option<Vec<PartUsageDraft>>,
    pub tasks: Option<Vec<TaskDraft>>,
}

/// 备件行草稿
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartUsageDraft {
    #[serde(rename = "partid", deserialize_with = "lenient_text")]
    pub part_id: Option<String>,
    #[serde(rename = "partnumber", deserialize_with = "lenient_text")]
    pub part_number: Option<String>,
    #[serde(deserialize_with = "lenient_minutes")]
    pub quantity: Option<i64>,
}

/// 维修步骤草稿
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    #[serde(deserialize_with = "lenient_minutes")]
    pub sequence: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "estimateddurationminutes", deserialize_with = "lenient_minutes")]
    pub estimated_duration_minutes: Option<i64>,
    #[serde(rename = "requiredskills", deserialize_with = "lenient_skills")]
    pub required_skills: Option<Vec<String>>,
    #[serde(rename = "safetynotes", deserialize_with = "lenient_text")]
    pub safety_notes: Option<String>,
}

/// 解析 LLM 原始文本为草稿
pub fn parse_draft(raw: &str) -> Result<WorkOrderDraft, PlanningError> {
    let json_str = extract_json_object(raw)
        .ok_or_else(|| PlanningError::parse("response contains no JSON object", raw))?;

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| PlanningError::parse(format!("malformed JSON: {}", e), raw))?;

    if !value.is_object() {
        return Err(PlanningError::parse("top-level JSON value is not an object", raw));
    }

    serde_json::from_value(fold_keys(value))
        .map_err(|e| PlanningError::parse(format!("unexpected shape: {}", e), raw))
}

/// 提取 JSON 块（```json ... ``` 或首个 '{' 到最后一个 '}'）
fn extract_json_object(output: &str) -> Option<&str> {
    let trimmed = output.trim();
    let body = if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        rest.find("```").map(|end| rest[..end].trim()).unwrap_or(rest.trim())
    } else if let Some(start) = trimmed.find("```") {
        let rest = &trimmed[start + 3..];
        rest.find("```").map(|end| rest[..end].trim()).unwrap_or(rest.trim())
    } else {
        trimmed
    };

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (end > start).then(|| &body[start..=end])
}

/// 递归规范化对象键：转小写并去掉 '_' 与 '-'
fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut folded = Map::with_capacity(map.len());
            for (key, inner) in map {
                let key: String = key
                    .chars()
                    .filter(|c| *c != '_' && *c != '-')
                    .flat_map(char::to_lowercase)
                    .collect();
                folded.insert(key, fold_keys(inner));
            }
            Value::Object(folded)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

/// 数字或文本（untagged）
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

fn coerce_minutes(raw: Loose) -> Result<Option<i64>, String> {
    match raw {
        Loose::Int(n) => Ok(Some(n)),
        Loose::Float(f) if f.is_finite() => Ok(Some(f.round() as i64)),
        Loose::Float(f) => Err(format!("non-finite number {}", f)),
        Loose::Bool(b) => Err(format!("expected integer, got {}", b)),
        Loose::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            if let Ok(n) = s.parse::<i64>() {
                return Ok(Some(n));
            }
            match s.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Some(f.round() as i64)),
                _ => Err(format!("expected integer, got {:?}", s)),
            }
        }
    }
}

fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => coerce_minutes(raw).map_err(de::Error::custom),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None => None,
        Some(Loose::Text(s)) => Some(s),
        Some(Loose::Int(n)) => Some(n.to_string()),
        Some(Loose::Float(f)) => Some(f.to_string()),
        Some(Loose::Bool(b)) => Some(b.to_string()),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillList {
    Many(Vec<String>),
    Joined(String),
}

fn lenient_skills<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<SkillList>::deserialize(deserializer)? {
        None => None,
        Some(SkillList::Many(list)) => Some(list),
        Some(SkillList::Joined(joined)) => Some(
            joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
    })
}
