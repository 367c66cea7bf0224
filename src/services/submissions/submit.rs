use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use super::SubmissionService;
use crate::config::AppConfig;
use crate::errors::{CourseworkError, Result};
use crate::grading::pick_least_loaded;
use crate::middlewares::RequireJWT;
use crate::models::submissions::entities::NewSubmission;
use crate::models::submissions::responses::SubmitResponse;
use crate::models::users::entities::TEACHING_ASSISTANTS_GROUP;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::file_magic::extension_of;
use crate::utils::validate_magic_bytes;

pub const PAST_DUE_MESSAGE: &str = "Assignment is past due and can no longer be submitted.";

/// 为新提交挑选批改人：该作业下负载最少的助教，平局取 ID 最小
pub async fn assign_grader(storage: &dyn Storage, assignment_id: i64) -> Result<Option<i64>> {
    let candidates = storage.list_group_member_ids(TEACHING_ASSISTANTS_GROUP).await?;
    if candidates.is_empty() {
        return Ok(None);
    }
    let load = storage.grader_load(assignment_id).await?;
    Ok(pick_least_loaded(&candidates, &load))
}

/// 已写入磁盘的上传文件
struct SavedUpload {
    stored_name: String,
    path: String,
    original_name: String,
    size: i64,
}

fn bad_request(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

fn upload_failed(e: CourseworkError) -> HttpResponse {
    tracing::error!("{}", e);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::FileUploadFailed,
        "Failed to store the uploaded file",
    ))
}

/// 读取 multipart 中唯一的 `file` 字段并落盘，其它字段忽略
async fn save_upload(
    mut payload: Multipart,
) -> std::result::Result<SavedUpload, HttpResponse> {
    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;

    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        return Err(upload_failed(CourseworkError::file_operation(format!(
            "Failed to create upload dir {upload_dir}: {e}"
        ))));
    }

    let mut saved: Option<SavedUpload> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }

        if let Some(previous) = &saved {
            let _ = fs::remove_file(&previous.path);
            return Err(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        let original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = extension_of(&original_name).unwrap_or_default();
        if !config
            .upload
            .allowed_types
            .iter()
            .any(|t| t.to_lowercase() == extension)
        {
            return Err(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        let stored_name = format!(
            "{}-{}{}",
            chrono::Utc::now().timestamp(),
            Uuid::new_v4(),
            extension
        );
        let path = format!("{upload_dir}/{stored_name}");
        let mut f = File::create(&path).map_err(|e| upload_failed(e.into()))?;

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    let _ = fs::remove_file(&path);
                    return Err(bad_request(
                        ErrorCode::FileUploadFailed,
                        &format!("Malformed upload: {e}"),
                    ));
                }
            };

            // 第一个 chunk 校验魔术字节
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&path);
                    return Err(bad_request(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                let _ = fs::remove_file(&path);
                return Err(bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&path);
                return Err(upload_failed(e.into()));
            }
        }

        if total_size == 0 {
            let _ = fs::remove_file(&path);
            return Err(bad_request(ErrorCode::FileUploadFailed, "Uploaded file is empty"));
        }

        saved = Some(SavedUpload {
            stored_name,
            path,
            original_name,
            size: total_size as i64,
        });
    }

    saved.ok_or_else(|| bad_request(ErrorCode::FileNotFound, "No file found in upload payload"))
}

pub async fn handle_submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };
    if !user.is_student() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::NotStudent,
            "Only students can submit assignments",
        )));
    }

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load assignment: {e}"),
                )),
            );
        }
    };

    if assignment.is_due() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentPastDue,
            PAST_DUE_MESSAGE,
        )));
    }

    // 已经提交过：保留原记录，本次上传直接丢弃
    match storage.find_submission(assignment_id, user.id).await {
        Ok(Some(existing)) => {
            info!(
                "User {} re-submitted assignment {}, keeping submission {}",
                user.id, assignment_id, existing.id
            );
            return Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmitResponse {
                    already_submitted: true,
                    submission: existing,
                },
                "A submission already exists; the new upload was not saved",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check existing submission: {e}"),
                )),
            );
        }
    }

    let upload = match save_upload(payload).await {
        Ok(upload) => upload,
        Err(response) => return Ok(response),
    };

    // 分配批改人；没有助教时留空，管理员仍可批改
    let grader_id = match assign_grader(storage.as_ref(), assignment_id).await {
        Ok(grader) => grader,
        Err(e) => {
            warn!("Failed to pick grader for assignment {}: {}", assignment_id, e);
            None
        }
    };
    if grader_id.is_none() {
        warn!(
            "No teaching assistant available for assignment {}, submission left without grader",
            assignment_id
        );
    }

    let new_submission = NewSubmission {
        assignment_id,
        author_id: user.id,
        grader_id,
        file: upload.stored_name,
        original_name: upload.original_name,
        file_size: upload.size,
    };

    match storage.create_submission(new_submission).await {
        Ok(submission) => {
            info!(
                "User {} submitted assignment {} (submission {}, grader {:?})",
                user.id, assignment_id, submission.id, submission.grader_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmitResponse {
                    already_submitted: false,
                    submission,
                },
                "Submission received",
            )))
        }
        Err(e) => {
            let _ = fs::remove_file(&upload.path);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    format!("Failed to save submission: {e}"),
                )),
            )
        }
    }
}
