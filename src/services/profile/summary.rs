use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::ProfileService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::grading::{StudentStatus, progress_status, weighted_average};
use crate::middlewares::RequireJWT;
use crate::models::assignments::entities::Assignment;
use crate::models::profile::responses::{ProfileAssignmentRow, ProfileResponse};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::{User, UserType};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::{Storage, SubmissionCountQuery};

/// 学生每个作业的状态
pub(super) struct StudentRow {
    pub assignment: Assignment,
    pub submission: Option<Submission>,
    pub status: StudentStatus,
}

impl StudentRow {
    pub fn to_profile_row(&self) -> ProfileAssignmentRow {
        ProfileAssignmentRow {
            assignment_id: self.assignment.id,
            title: self.assignment.title.clone(),
            deadline: self.assignment.deadline,
            weight: self.assignment.weight,
            status: self.status.label(),
            score: self.submission.as_ref().and_then(|s| s.score),
            graded: None,
            total: None,
        }
    }
}

pub(super) async fn student_rows(storage: &dyn Storage, user: &User) -> Result<Vec<StudentRow>> {
    let now = chrono::Utc::now();
    let assignments = storage.list_assignments().await?;

    // 同一作业有多条提交时取最早的一条
    let mut by_assignment: HashMap<i64, Submission> = HashMap::new();
    for submission in storage.list_author_submissions(user.id).await? {
        by_assignment
            .entry(submission.assignment_id)
            .or_insert(submission);
    }

    Ok(assignments
        .into_iter()
        .map(|assignment| {
            let submission = by_assignment.remove(&assignment.id);
            let status = StudentStatus::classify(assignment.is_due_at(now), submission.as_ref());
            StudentRow {
                assignment,
                submission,
                status,
            }
        })
        .collect())
}

/// 已批改提交的加权平均
pub(super) fn final_grade(rows: &[StudentRow]) -> Option<f64> {
    weighted_average(rows.iter().filter_map(|row| {
        row.submission
            .as_ref()
            .and_then(|s| s.score)
            .map(|score| (score, row.assignment.weight))
    }))
}

async fn staff_rows(
    storage: &dyn Storage,
    user: &User,
    user_type: UserType,
) -> Result<Vec<ProfileAssignmentRow>> {
    let now = chrono::Utc::now();
    let grader_id = match user_type {
        UserType::Ta => Some(user.id),
        _ => None,
    };

    let mut rows = Vec::new();
    for assignment in storage.list_assignments().await? {
        let base = SubmissionCountQuery {
            assignment_id: Some(assignment.id),
            grader_id,
            graded: None,
        };
        let total = storage.count_submissions(base).await?;
        let graded = storage
            .count_submissions(SubmissionCountQuery {
                graded: Some(true),
                ..base
            })
            .await?;

        rows.push(ProfileAssignmentRow {
            assignment_id: assignment.id,
            status: progress_status(assignment.is_due_at(now), graded, total),
            title: assignment.title,
            deadline: assignment.deadline,
            weight: assignment.weight,
            score: None,
            graded: Some(graded),
            total: Some(total),
        });
    }
    Ok(rows)
}

async fn build_profile(storage: &dyn Storage, user: User, user_type: UserType) -> Result<ProfileResponse> {
    let (assignments, final_grade) = match user_type {
        UserType::Student => {
            let rows = student_rows(storage, &user).await?;
            let grade = final_grade(&rows);
            (rows.iter().map(StudentRow::to_profile_row).collect(), Some(grade))
        }
        UserType::Ta | UserType::Admin => (staff_rows(storage, &user, user_type).await?, None),
        UserType::Other | UserType::AnonymousUser => (Vec::new(), None),
    };

    Ok(ProfileResponse {
        user,
        user_type,
        assignments,
        final_grade,
    })
}

pub async fn get_profile(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };
    let user_type = user.user_type(&AppConfig::get().app.admin_username);

    match build_profile(storage.as_ref(), user, user_type).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(profile, "Profile"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to build profile: {e}"),
            )),
        ),
    }
}
