use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// 校验分数是否在 [0, 100] 内
pub fn validate_score(score: f64) -> Result<f64, String> {
    if score.is_nan() || !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(format!(
            "Score {score} is out of range [{MIN_SCORE}, {MAX_SCORE}]"
        ));
    }
    Ok(score)
}

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub author_id: i64,
    pub grader_id: Option<i64>,
    /// 存储文件名（uploads 目录下）
    pub file: String,
    pub original_name: String,
    pub file_size: i64,
    pub score: Option<f64>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }

    /// 是否可以下载：作者本人、批改人、或 staff
    pub fn can_be_downloaded_by(&self, user: &crate::models::users::entities::User) -> bool {
        user.is_staff || self.author_id == user.id || self.grader_id == Some(user.id)
    }
}

/// 写库前的提交数据
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub author_id: i64,
    pub grader_id: Option<i64>,
    pub file: String,
    pub original_name: String,
    pub file_size: i64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::users::entities::tests::user_with;

    pub(crate) fn submission(author_id: i64, grader_id: Option<i64>, score: Option<f64>) -> Submission {
        Submission {
            id: 1,
            assignment_id: 1,
            author_id,
            grader_id,
            file: "1700000000-a.pdf".to_string(),
            original_name: "hw.pdf".to_string(),
            file_size: 10,
            score,
            submitted_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_score() {
        assert_eq!(validate_score(0.0), Ok(0.0));
        assert_eq!(validate_score(100.0), Ok(100.0));
        assert!(validate_score(100.5).is_err());
        assert!(validate_score(-0.1).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn test_is_graded() {
        assert!(!submission(2, None, None).is_graded());
        assert!(submission(2, None, Some(0.0)).is_graded());
    }

    #[test]
    fn test_download_permission() {
        let sub = submission(2, Some(3), None);

        let mut author = user_with("author", &[], false);
        author.id = 2;
        let mut grader = user_with("grader", &[], false);
        grader.id = 3;
        let mut stranger = user_with("stranger", &[], false);
        stranger.id = 4;
        let mut staff = user_with("staffer", &[], false);
        staff.id = 5;
        staff.is_staff = true;

        assert!(sub.can_be_downloaded_by(&author));
        assert!(sub.can_be_downloaded_by(&grader));
        assert!(sub.can_be_downloaded_by(&staff));
        assert!(!sub.can_be_downloaded_by(&stranger));
    }
}
