use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::Submission;

/// 列表项，附带是否已截止
#[derive(Debug, Serialize)]
pub struct AssignmentListItem {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub is_due: bool,
}

#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub items: Vec<AssignmentListItem>,
}

/// 助教/管理员视角的统计
#[derive(Debug, Serialize)]
pub struct StaffAssignmentStats {
    pub total_submissions: u64,
    /// 分配给当前用户批改的提交数
    pub ta_assignments: u64,
    pub total_students: u64,
}

/// 学生自己的提交
#[derive(Debug, Serialize)]
pub struct OwnSubmission {
    pub id: i64,
    pub file: String,
    pub original_name: String,
    pub score: Option<f64>,
    pub is_graded: bool,
    pub is_past_due: bool,
    pub submitted_at: DateTime<Utc>,
}

impl OwnSubmission {
    pub fn from_submission(submission: Submission, assignment: &Assignment) -> Self {
        Self {
            is_graded: submission.is_graded(),
            is_past_due: assignment.is_due(),
            id: submission.id,
            file: submission.file,
            original_name: submission.original_name,
            score: submission.score,
            submitted_at: submission.submitted_at,
        }
    }
}

/// 作业详情，按身份附带不同内容
#[derive(Debug, Serialize)]
pub struct AssignmentDetailResponse {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub is_due: bool,
    pub user_type: crate::models::users::entities::UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StaffAssignmentStats>,
    /// 仅学生视角出现；没有提交时为 null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Option<OwnSubmission>>,
}
