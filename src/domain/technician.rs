use serde::{Deserialize, Serialize};

/// 技师档案；`match_score` 为单次请求内的排序分，不落库
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(skip)]
    pub match_score: usize,
}

impl Technician {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        skills: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            available: true,
            match_score: 0,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_score_is_not_serialized() {
        let mut tech = Technician::new("tech-1", "Ana", "Maintenance", &["welding"]);
        tech.match_score = 3;

        let json = serde_json::to_string(&tech).unwrap();
        assert!(!json.contains("matchScore"));
        assert!(!json.contains("match_score"));

        let back: Technician = serde_json::from_str(&json).unwrap();
        assert_eq!(back.match_score, 0);
        assert_eq!(back.skills, vec!["welding".to_string()]);
    }
}
