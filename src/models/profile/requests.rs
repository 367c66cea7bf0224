use serde::Deserialize;
use std::collections::HashMap;

/// 更新个人资料
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

/// 假设成绩：作业 ID → 假设分数（0-100）
#[derive(Debug, Deserialize)]
pub struct HypothesizeRequest {
    #[serde(default)]
    pub scores: HashMap<i64, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hypothesize_keys_from_json_strings() {
        let req: HypothesizeRequest =
            serde_json::from_str(r#"{"scores": {"3": 90, "7": 72.5}}"#).unwrap();
        assert_eq!(req.scores.get(&3), Some(&90.0));
        assert_eq!(req.scores.get(&7), Some(&72.5));

        let empty: HypothesizeRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.scores.is_empty());
    }
}
