use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::submissions::entities::Submission;

/// 批改列表中的一行，带作者信息
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionListItem {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub author_display_name: Option<String>,
    pub grader_id: Option<i64>,
    pub file: String,
    pub original_name: String,
    pub score: Option<f64>,
    pub is_graded: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub assignment_id: i64,
    pub items: Vec<SubmissionListItem>,
}

/// 批量打分结果
#[derive(Debug, Default, Serialize)]
pub struct GradeSummary {
    pub updated: usize,
    pub cleared: usize,
    /// 格式错误、越界、不存在或无权限的条目
    pub skipped: usize,
    pub skipped_keys: Vec<String>,
}

/// 上传结果
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// true 表示已有提交，本次上传被丢弃
    pub already_submitted: bool,
    pub submission: Submission,
}
