use serde::{Deserialize, Serialize};

/// 学生组名
pub const STUDENTS_GROUP: &str = "Students";
/// 助教组名
pub const TEACHING_ASSISTANTS_GROUP: &str = "Teaching Assistants";

// 用户身份类型（由用户组与管理员用户名推导，不落库）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    Student,
    #[serde(rename = "TA")]
    Ta,
    Admin,
    Other,
    AnonymousUser,
}

impl UserType {
    pub const STUDENT: &'static str = "Student";
    pub const TA: &'static str = "TA";
    pub const ADMIN: &'static str = "Admin";
    pub const OTHER: &'static str = "Other";
    pub const ANONYMOUS: &'static str = "AnonymousUser";

    pub fn staff_types() -> &'static [UserType] {
        &[UserType::Ta, UserType::Admin]
    }
    pub fn student_types() -> &'static [UserType] {
        &[UserType::Student]
    }
    pub fn admin_types() -> &'static [UserType] {
        &[UserType::Admin]
    }

    /// 按优先级识别身份：未登录 → 学生组 → 助教组 → 管理员 → 其他
    pub fn resolve(user: Option<&User>, admin_username: &str) -> Self {
        match user {
            None => UserType::AnonymousUser,
            Some(u) if u.is_student() => UserType::Student,
            Some(u) if u.is_ta() => UserType::Ta,
            Some(u) if u.is_admin(admin_username) => UserType::Admin,
            Some(_) => UserType::Other,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserType::Student => UserType::STUDENT,
            UserType::Ta => UserType::TA,
            UserType::Admin => UserType::ADMIN,
            UserType::Other => UserType::OTHER,
            UserType::AnonymousUser => UserType::ANONYMOUS,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserType::STUDENT => Ok(UserType::Student),
            UserType::TA => Ok(UserType::Ta),
            UserType::ADMIN => Ok(UserType::Admin),
            UserType::OTHER => Ok(UserType::Other),
            UserType::ANONYMOUS => Ok(UserType::AnonymousUser),
            _ => Err(format!("Invalid user type: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub display_name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub groups: Vec<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn in_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g == name)
    }

    pub fn is_student(&self) -> bool {
        self.in_group(STUDENTS_GROUP)
    }

    pub fn is_ta(&self) -> bool {
        self.in_group(TEACHING_ASSISTANTS_GROUP)
    }

    pub fn is_admin(&self, admin_username: &str) -> bool {
        self.username == admin_username && self.is_superuser
    }

    pub fn user_type(&self, admin_username: &str) -> UserType {
        UserType::resolve(Some(self), admin_username)
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(&self, admin_username: &str) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.user_type(admin_username).to_string(),
        )
        .map_err(|e| format!("Failed to generate token pair: {e}"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn user_with(username: &str, groups: &[&str], is_superuser: bool) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            password_hash: String::new(),
            display_name: None,
            is_staff: false,
            is_superuser,
            is_active: true,
            groups: groups.iter().map(|g| g.to_string()).collect(),
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_anonymous() {
        assert_eq!(UserType::resolve(None, "admin"), UserType::AnonymousUser);
    }

    #[test]
    fn test_group_precedence() {
        let both = user_with("alice", &[TEACHING_ASSISTANTS_GROUP, STUDENTS_GROUP], false);
        assert_eq!(both.user_type("admin"), UserType::Student);

        let ta = user_with("bob", &[TEACHING_ASSISTANTS_GROUP], true);
        assert_eq!(ta.user_type("bob"), UserType::Ta);
    }

    #[test]
    fn test_admin_requires_name_and_superuser() {
        assert_eq!(user_with("admin", &[], true).user_type("admin"), UserType::Admin);
        assert_eq!(user_with("admin", &[], false).user_type("admin"), UserType::Other);
        assert_eq!(user_with("root", &[], true).user_type("admin"), UserType::Other);
    }

    #[test]
    fn test_user_type_round_trip_names() {
        assert_eq!(UserType::Ta.to_string(), "TA");
        assert_eq!("AnonymousUser".parse::<UserType>(), Ok(UserType::AnonymousUser));
        assert!("teacher".parse::<UserType>().is_err());
        assert_eq!(serde_json::to_string(&UserType::Ta).unwrap(), "\"TA\"");
    }
}
