use super::entities::{User, UserType};
use serde::Serialize;

// 用户响应
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_type: UserType,
    pub user: User,
}
