use serde::Deserialize;
use std::collections::HashMap;

use crate::models::submissions::entities::validate_score;

const GRADE_FIELD_PREFIX: &str = "grade-";

/// 批量打分表单中的单个值，兼容字符串与数字
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GradeInput {
    Number(f64),
    Text(String),
    Null,
}

/// `{"grade-<submission id>": "<score>"}`，其它键忽略
pub type GradeForm = HashMap<String, GradeInput>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeEntry {
    pub submission_id: i64,
    /// None 表示清除分数
    pub score: Option<f64>,
}

/// 解析结果：合法条目 + 被跳过的键
#[derive(Debug, Default)]
pub struct ParsedGrades {
    pub entries: Vec<GradeEntry>,
    pub skipped: Vec<String>,
}

fn parse_value(input: &GradeInput) -> Result<Option<f64>, ()> {
    let score = match input {
        GradeInput::Null => return Ok(None),
        GradeInput::Text(text) if text.trim().is_empty() => return Ok(None),
        GradeInput::Text(text) => text.trim().parse::<f64>().map_err(|_| ())?,
        GradeInput::Number(n) => *n,
    };
    validate_score(score).map(Some).map_err(|_| ())
}

pub fn parse_grade_form(form: &GradeForm) -> ParsedGrades {
    let mut parsed = ParsedGrades::default();
    for (key, value) in form {
        let Some(raw_id) = key.strip_prefix(GRADE_FIELD_PREFIX) else {
            continue;
        };
        let id = raw_id.parse::<i64>().ok().filter(|id| *id > 0);
        match (id, parse_value(value)) {
            (Some(submission_id), Ok(score)) => parsed.entries.push(GradeEntry {
                submission_id,
                score,
            }),
            _ => parsed.skipped.push(key.clone()),
        }
    }
    parsed.entries.sort_by_key(|e| e.submission_id);
    parsed.skipped.sort();
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, GradeInput)]) -> GradeForm {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_mixed_form() {
        let parsed = parse_grade_form(&form(&[
            ("grade-3", GradeInput::Text("95.5".into())),
            ("grade-1", GradeInput::Number(80.0)),
            ("grade-2", GradeInput::Text("".into())),
            ("grade-4", GradeInput::Text("abc".into())),
            ("grade-5", GradeInput::Number(101.0)),
            ("grade-x", GradeInput::Text("50".into())),
            ("csrfmiddlewaretoken", GradeInput::Text("t".into())),
        ]));

        assert_eq!(
            parsed.entries,
            vec![
                GradeEntry { submission_id: 1, score: Some(80.0) },
                GradeEntry { submission_id: 2, score: None },
                GradeEntry { submission_id: 3, score: Some(95.5) },
            ]
        );
        assert_eq!(parsed.skipped, vec!["grade-4", "grade-5", "grade-x"]);
    }

    #[test]
    fn test_null_clears() {
        let parsed = parse_grade_form(&form(&[("grade-9", GradeInput::Null)]));
        assert_eq!(parsed.entries[0].score, None);
    }

    #[test]
    fn test_deserialize_from_json() {
        let form: GradeForm =
            serde_json::from_str(r#"{"grade-1": "90", "grade-2": 70, "grade-3": null}"#).unwrap();
        let parsed = parse_grade_form(&form);
        assert_eq!(parsed.entries.len(), 3);
        assert!(parsed.skipped.is_empty());
    }
}
