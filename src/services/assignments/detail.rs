use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::responses::{
    AssignmentDetailResponse, OwnSubmission, StaffAssignmentStats,
};
use crate::models::users::entities::{STUDENTS_GROUP, User, UserType};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::{Storage, SubmissionCountQuery};

async fn staff_stats(
    storage: &dyn Storage,
    assignment_id: i64,
    user: &User,
) -> Result<StaffAssignmentStats> {
    let total_submissions = storage
        .count_submissions(SubmissionCountQuery {
            assignment_id: Some(assignment_id),
            ..Default::default()
        })
        .await?;
    let ta_assignments = storage
        .count_submissions(SubmissionCountQuery {
            assignment_id: Some(assignment_id),
            grader_id: Some(user.id),
            ..Default::default()
        })
        .await?;
    let total_students = storage.count_group_members(STUDENTS_GROUP).await?;

    Ok(StaffAssignmentStats {
        total_submissions,
        ta_assignments,
        total_students,
    })
}

async fn build_detail(
    storage: &dyn Storage,
    assignment: Assignment,
    user: &User,
    user_type: UserType,
) -> Result<AssignmentDetailResponse> {
    let mut detail = AssignmentDetailResponse {
        is_due: assignment.is_due(),
        user_type,
        stats: None,
        submission: None,
        assignment,
    };

    match user_type {
        UserType::Ta | UserType::Admin => {
            detail.stats = Some(staff_stats(storage, detail.assignment.id, user).await?);
        }
        UserType::Student => {
            let own = storage
                .find_submission(detail.assignment.id, user.id)
                .await?
                .map(|s| OwnSubmission::from_submission(s, &detail.assignment));
            detail.submission = Some(own);
        }
        UserType::Other | UserType::AnonymousUser => {}
    }

    Ok(detail)
}

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };
    let user_type = user.user_type(&AppConfig::get().app.admin_username);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
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

    match build_detail(storage.as_ref(), assignment, &user, user_type).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Assignment detail"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load assignment detail: {e}"),
            )),
        ),
    }
}
