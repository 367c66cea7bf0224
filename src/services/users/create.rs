use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{STUDENTS_GROUP, TEACHING_ASSISTANTS_GROUP},
        requests::{CreateUserParams, CreateUserRequest},
        responses::UserResponse,
    },
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

const KNOWN_GROUPS: [&str; 2] = [STUDENTS_GROUP, TEACHING_ASSISTANTS_GROUP];

pub async fn create_user(
    service: &UserService,
    params: CreateUserParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证用户名
    if let Err(msg) = validate_username(&params.username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&params.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Err(msg) = validate_password_simple(&params.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    if let Some(unknown) = params
        .groups
        .iter()
        .find(|g| !KNOWN_GROUPS.contains(&g.as_str()))
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Unknown group: {unknown}"),
        )));
    }

    let storage = service.get_storage(request);

    // 用户名、邮箱唯一
    match storage.get_user_by_username(&params.username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check username: {e}"),
                )),
            );
        }
    }
    match storage.get_user_by_email(&params.email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email is already in use",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check email: {e}"),
                )),
            );
        }
    }

    let password = match hash_password(&params.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    // 超级用户只在启动时创建
    let user_data = CreateUserRequest {
        username: params.username,
        email: params.email,
        password,
        display_name: params.display_name.filter(|n| !n.trim().is_empty()),
        is_staff: params.is_staff,
        is_superuser: false,
        groups: params.groups,
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with groups {:?}", user.username, user.groups);
            let user_type = user.user_type(&AppConfig::get().app.admin_username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user_type, user },
                "User created",
            )))
        }
        Err(e) => {
            let msg = format!("User creation failed: {e}");
            error!("{}", msg);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
        }
    }
}
