use crate::models::submissions::entities::Submission;

/// 学生视角的作业状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StudentStatus {
    NotDue,
    Graded(f64),
    Ungraded,
    Missing,
}

impl StudentStatus {
    /// 未截止一律 NotDue；截止后看提交与分数
    pub fn classify(is_due: bool, submission: Option<&Submission>) -> Self {
        if !is_due {
            return StudentStatus::NotDue;
        }
        match submission {
            Some(sub) => match sub.score {
                Some(score) => StudentStatus::Graded(score),
                None => StudentStatus::Ungraded,
            },
            None => StudentStatus::Missing,
        }
    }

    pub fn label(&self) -> String {
        match self {
            StudentStatus::NotDue => "Not Due".to_string(),
            StudentStatus::Graded(score) => format!("{}%", format_score(*score)),
            StudentStatus::Ungraded => "Ungraded".to_string(),
            StudentStatus::Missing => "Missing".to_string(),
        }
    }
}

/// 整数分数保留一位小数，如 95 → "95.0"
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        format!("{score}")
    }
}

/// 助教/管理员视角："<已批改> / <总数>"，未截止为 "Not due"
pub fn progress_status(is_due: bool, graded: u64, total: u64) -> String {
    if is_due {
        format!("{graded} / {total}")
    } else {
        "Not due".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::tests::submission;

    #[test]
    fn test_classify() {
        let graded = submission(1, None, Some(95.0));
        let ungraded = submission(1, None, None);

        assert_eq!(StudentStatus::classify(false, Some(&graded)), StudentStatus::NotDue);
        assert_eq!(StudentStatus::classify(false, None), StudentStatus::NotDue);
        assert_eq!(
            StudentStatus::classify(true, Some(&graded)),
            StudentStatus::Graded(95.0)
        );
        assert_eq!(StudentStatus::classify(true, Some(&ungraded)), StudentStatus::Ungraded);
        assert_eq!(StudentStatus::classify(true, None), StudentStatus::Missing);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StudentStatus::Graded(95.0).label(), "95.0%");
        assert_eq!(StudentStatus::Graded(87.5).label(), "87.5%");
        assert_eq!(StudentStatus::NotDue.label(), "Not Due");
        assert_eq!(StudentStatus::Missing.label(), "Missing");
    }

    #[test]
    fn test_progress_status() {
        assert_eq!(progress_status(true, 3, 10), "3 / 10");
        assert_eq!(progress_status(false, 3, 10), "Not due");
    }
}
