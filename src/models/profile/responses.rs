use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::users::entities::{User, UserType};

/// 个人主页上的一行作业
#[derive(Debug, Clone, Serialize)]
pub struct ProfileAssignmentRow {
    pub assignment_id: i64,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub weight: i32,
    pub status: String,
    /// 学生视角：自己的分数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// 助教/管理员视角：已批改数量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graded: Option<u64>,
    /// 助教：分配给自己的数量；管理员：提交总数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub user_type: UserType,
    pub assignments: Vec<ProfileAssignmentRow>,
    /// 仅学生；没有已批改的提交时为 null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_grade: Option<Option<f64>>,
}

#[derive(Debug, Serialize)]
pub struct HypothesizeResponse {
    pub hypothesized_grade: f64,
    /// 未被采用的假设分数：作业不存在、已批改或缺交、分数超出 [0, 100]
    pub ignored_assignment_ids: Vec<i64>,
    pub assignments: Vec<ProfileAssignmentRow>,
}
