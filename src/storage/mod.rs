use std::collections::HashMap;

use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    submissions::{
        entities::{NewSubmission, Submission},
        responses::SubmissionListItem,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

/// 提交计数条件，None 表示不限
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionCountQuery {
    pub assignment_id: Option<i64>,
    pub grader_id: Option<i64>,
    pub graded: Option<bool>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（连同用户组）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 用户组
    // 不存在则创建，返回组 ID
    async fn ensure_group(&self, name: &str) -> Result<i64>;
    // 组内成员 ID，按 ID 升序
    async fn list_group_member_ids(&self, name: &str) -> Result<Vec<i64>>;
    async fn count_group_members(&self, name: &str) -> Result<u64>;

    /// 作业
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 全部作业，按 ID 升序
    async fn list_assignments(&self) -> Result<Vec<Assignment>>;

    /// 提交
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 通过存储文件名获取
    async fn get_submission_by_file(&self, file: &str) -> Result<Option<Submission>>;
    // 某学生在某作业下最早的一条提交
    async fn find_submission(&self, assignment_id: i64, author_id: i64)
    -> Result<Option<Submission>>;
    // 作业下的提交（可按批改人过滤），按作者用户名排序
    async fn list_submissions_for_assignment(
        &self,
        assignment_id: i64,
        grader_id: Option<i64>,
    ) -> Result<Vec<SubmissionListItem>>;
    // 某学生的全部提交，按 ID 升序
    async fn list_author_submissions(&self, author_id: i64) -> Result<Vec<Submission>>;
    async fn count_submissions(&self, query: SubmissionCountQuery) -> Result<u64>;
    // 各批改人在该作业下已分配的提交数
    async fn grader_load(&self, assignment_id: i64) -> Result<HashMap<i64, u64>>;
    // 设置或清除分数
    async fn set_submission_score(&self, id: i64, score: Option<f64>)
    -> Result<Option<Submission>>;
}
