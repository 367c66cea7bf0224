use crate::models::users::entities::{User, UserType};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user_type: UserType,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// 当前身份识别结果，未登录时 `user` 为空
#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub user_type: UserType,
    pub user: Option<User>,
}
