use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::SubmissionService;
use crate::config::AppConfig;
use crate::errors::CourseworkError;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::{GradeForm, parse_grade_form};
use crate::models::submissions::responses::GradeSummary;
use crate::models::{ApiResponse, ErrorCode};

/// 批量打分
///
/// 每个 `grade-<id>` 独立处理：格式错误、越界、不属于该作业、
/// 或当前助教不是批改人的条目被跳过并计数，不影响其它条目。
pub async fn grade_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    form: GradeForm,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };
    let is_admin = user.is_admin(&AppConfig::get().app.admin_username);
    if !is_admin && !user.is_ta() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only teaching assistants and the admin can grade",
        )));
    }

    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(_)) => {}
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
    }

    let parsed = parse_grade_form(&form);
    let mut summary = GradeSummary {
        skipped_keys: parsed.skipped,
        ..Default::default()
    };

    for entry in parsed.entries {
        let key = format!("grade-{}", entry.submission_id);

        let submission = match storage.get_submission_by_id(entry.submission_id).await {
            Ok(Some(s)) if s.assignment_id == assignment_id => s,
            Ok(_) => {
                summary.skipped_keys.push(key);
                continue;
            }
            Err(e) => {
                warn!("Failed to load submission {}: {}", entry.submission_id, e);
                summary.skipped_keys.push(key);
                continue;
            }
        };

        // 只有该提交的批改人或管理员可以打分
        if !is_admin && submission.grader_id != Some(user.id) {
            summary.skipped_keys.push(key);
            continue;
        }

        match storage.set_submission_score(submission.id, entry.score).await {
            Ok(Some(_)) => match entry.score {
                Some(_) => summary.updated += 1,
                None => summary.cleared += 1,
            },
            Ok(None) => summary.skipped_keys.push(key),
            Err(CourseworkError::ScoreOutOfRange(msg)) => {
                info!("Rejected score for submission {}: {}", submission.id, msg);
                summary.skipped_keys.push(key);
            }
            Err(e) => {
                warn!("Failed to grade submission {}: {}", submission.id, e);
                summary.skipped_keys.push(key);
            }
        }
    }

    summary.skipped = summary.skipped_keys.len();
    info!(
        "User {} graded assignment {}: {} updated, {} cleared, {} skipped",
        user.id, assignment_id, summary.updated, summary.cleared, summary.skipped
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "Grades saved")))
}
