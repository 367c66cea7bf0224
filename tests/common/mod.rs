//! 集成测试共用的存储、用户与请求构造

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use cs_coursework::cache::{MokaCacheWrapper, ObjectCache};
use cs_coursework::config::AppConfig;
use cs_coursework::models::assignments::entities::Assignment;
use cs_coursework::models::assignments::requests::CreateAssignmentRequest;
use cs_coursework::models::submissions::entities::{NewSubmission, Submission};
use cs_coursework::models::users::entities::{
    STUDENTS_GROUP, TEACHING_ASSISTANTS_GROUP, User,
};
use cs_coursework::models::users::requests::CreateUserRequest;
use cs_coursework::storage::{SeaOrmStorage, Storage};
use cs_coursework::utils::jwt::JwtUtils;

pub const PASSWORD: &str = "Coursework#2024";
pub const BOUNDARY: &str = "----coursework-test-boundary";

/// 内存 SQLite，已迁移并建好两个用户组
pub async fn storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect(":memory:", 1, 5)
        .await
        .expect("in-memory database");
    let storage: Arc<dyn Storage> = Arc::new(storage);
    storage.ensure_group(STUDENTS_GROUP).await.unwrap();
    storage.ensure_group(TEACHING_ASSISTANTS_GROUP).await.unwrap();
    storage
}

pub fn cache() -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::with_settings(1_000, 60))
}

/// 构建与 main 相同路由的测试 App
#[macro_export]
macro_rules! app {
    ($storage:expr, $cache:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::JsonConfig::default().error_handler(
                    cs_coursework::utils::json_error_handler,
                ))
                .app_data(actix_web::web::QueryConfig::default().error_handler(
                    cs_coursework::utils::query_error_handler,
                ))
                .app_data(actix_web::web::Data::new($storage.clone()))
                .app_data(actix_web::web::Data::new($cache.clone()))
                .configure(cs_coursework::routes::configure_routes),
        )
        .await
    };
}

async fn create_user(
    storage: &Arc<dyn Storage>,
    username: &str,
    groups: &[&str],
    is_staff: bool,
    is_superuser: bool,
) -> User {
    let password = cs_coursework::utils::password::hash_password(PASSWORD).unwrap();
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            password,
            display_name: None,
            is_staff,
            is_superuser,
            groups: groups.iter().map(|g| g.to_string()).collect(),
        })
        .await
        .expect("create user")
}

pub async fn student(storage: &Arc<dyn Storage>, username: &str) -> User {
    create_user(storage, username, &[STUDENTS_GROUP], false, false).await
}

pub async fn ta(storage: &Arc<dyn Storage>, username: &str) -> User {
    create_user(storage, username, &[TEACHING_ASSISTANTS_GROUP], false, false).await
}

pub async fn staff(storage: &Arc<dyn Storage>, username: &str) -> User {
    create_user(storage, username, &[], true, false).await
}

pub async fn admin(storage: &Arc<dyn Storage>) -> User {
    let username = AppConfig::get().app.admin_username.clone();
    create_user(storage, &username, &[], true, true).await
}

pub async fn other(storage: &Arc<dyn Storage>, username: &str) -> User {
    create_user(storage, username, &[], false, false).await
}

/// Bearer 头
pub fn bearer(user: &User) -> (String, String) {
    let role = user
        .user_type(&AppConfig::get().app.admin_username)
        .to_string();
    let token = JwtUtils::generate_access_token(user.id, &role).unwrap();
    ("Authorization".to_string(), format!("Bearer {token}"))
}

pub async fn assignment(
    storage: &Arc<dyn Storage>,
    title: &str,
    deadline: DateTime<Utc>,
    weight: i32,
) -> Assignment {
    storage
        .create_assignment(CreateAssignmentRequest {
            title: title.to_string(),
            description: String::new(),
            deadline,
            weight,
            points: 100,
        })
        .await
        .expect("create assignment")
}

pub async fn past_assignment(storage: &Arc<dyn Storage>, title: &str, weight: i32) -> Assignment {
    assignment(storage, title, Utc::now() - Duration::days(1), weight).await
}

pub async fn future_assignment(storage: &Arc<dyn Storage>, title: &str, weight: i32) -> Assignment {
    assignment(storage, title, Utc::now() + Duration::days(7), weight).await
}

/// 直接写入一条提交（不经过上传）
pub async fn submission(
    storage: &Arc<dyn Storage>,
    assignment: &Assignment,
    author: &User,
    grader: Option<&User>,
    score: Option<f64>,
) -> Submission {
    let created = storage
        .create_submission(NewSubmission {
            assignment_id: assignment.id,
            author_id: author.id,
            grader_id: grader.map(|g| g.id),
            file: format!("{}-{}.pdf", assignment.id, uuid::Uuid::new_v4()),
            original_name: format!("{}.pdf", author.username),
            file_size: 128,
        })
        .await
        .expect("create submission");
    match score {
        Some(_) => storage
            .set_submission_score(created.id, score)
            .await
            .unwrap()
            .unwrap(),
        None => created,
    }
}

/// 单文件 multipart 请求体
pub fn multipart_file(filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n".to_vec()
}
