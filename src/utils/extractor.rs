use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_param(message: &str) -> actix_web::Error {
    InternalError::from_response(
        message.to_string(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 路径中的 `{id}`，必须是正整数
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0);

        ready(match parsed {
            Some(id) => Ok(SafeIDI64(id)),
            None => Err(bad_param("Invalid id in path")),
        })
    }
}

/// 路径中的 `{filename}`，拒绝目录穿越与隐藏文件
#[derive(Debug, Clone)]
pub struct SafeFileName(pub String);

impl SafeFileName {
    pub fn is_safe(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= 255
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !name.contains("..")
    }
}

impl FromRequest for SafeFileName {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let name = req.match_info().get("filename").unwrap_or_default();
        ready(if Self::is_safe(name) {
            Ok(SafeFileName(name.to_string()))
        } else {
            Err(bad_param("Invalid file name"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert!(SafeFileName::is_safe("1735689600-3f2a.pdf"));
        assert!(!SafeFileName::is_safe("../etc/passwd"));
        assert!(!SafeFileName::is_safe(".env"));
        assert!(!SafeFileName::is_safe("a/b.pdf"));
        assert!(!SafeFileName::is_safe(""));
    }
}
