use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{RefreshTokenResponse, WhoAmIResponse};
use crate::models::users::entities::UserType;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn expired_response() -> HttpResponse {
    // 清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_response());
        }
    };

    // 用户可能已被停用或组别已变化，重新加载
    let storage = service.get_storage(request);
    let user = match JwtUtils::user_id(&claims) {
        Some(id) => storage.get_user_by_id(id).await,
        None => return Ok(expired_response()),
    };

    let user = match user {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => return Ok(expired_response()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to refresh token: {e}"),
                )),
            );
        }
    };

    let role = user.user_type(&config.app.admin_username).to_string();
    match JwtUtils::generate_access_token(user.id, &role) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

/// 可选认证：没有或无效的 token 视为匿名
pub async fn handle_whoami(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::authenticate(request).await;
    let user_type = UserType::resolve(user.as_ref(), &service.get_config().app.admin_username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        WhoAmIResponse { user_type, user },
        "OK",
    )))
}
