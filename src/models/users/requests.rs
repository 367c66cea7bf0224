use serde::Deserialize;

// 管理员创建用户请求（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub groups: Vec<String>,
}

// 用户创建请求（用于存储层，password 为哈希后的值）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub groups: Vec<String>,
}

// 用户更新请求（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
}
