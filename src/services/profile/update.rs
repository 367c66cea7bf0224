use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use super::ProfileService;
use crate::cache::{self, ObjectCache};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::bearer_token;
use crate::models::profile::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

pub async fn handle_update_profile(
    service: &ProfileService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 获取当前用户信息
    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Authentication required",
            )));
        }
    };

    // 邮箱格式与唯一性
    if let Some(ref email) = update_data.email {
        if let Err(msg) = validate_email(email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        match storage.get_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != current_user.id => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserEmailAlreadyExists,
                    "Email is already in use",
                )));
            }
            Ok(_) => {}
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to check email: {e}"),
                    )),
                );
            }
        }
    }

    // 处理密码（如果提供了新密码）
    let hashed_password = if let Some(ref password) = update_data.password {
        if let Err(msg) = validate_password_simple(password) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserPasswordInvalid,
                msg,
            )));
        }

        match hash_password(password) {
            Ok(hash) => Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to hash password: {e}"),
                    )),
                );
            }
        }
    } else {
        None
    };

    // 用户组与 staff/superuser 标志不可自行修改
    let storage_update = UpdateUserRequest {
        email: update_data.email,
        password: hashed_password,
        display_name: update_data.display_name,
    };

    match storage.update_user(current_user.id, storage_update).await {
        Ok(Some(user)) => {
            // 缓存中的旧用户信息作废
            if let (Some(token), Some(cache)) = (
                bearer_token(request),
                request.app_data::<web::Data<Arc<dyn ObjectCache>>>(),
            ) {
                cache.remove(&cache::user_key(token)).await;
            }

            let user_type = user.user_type(&AppConfig::get().app.admin_username);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user_type, user },
                "Profile updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            format!("Failed to update profile: {e}"),
        ))),
    }
}
