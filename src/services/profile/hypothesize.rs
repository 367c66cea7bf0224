use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use super::summary::student_rows;
use crate::grading::{HypothesisRow, hypothesize};
use crate::middlewares::RequireJWT;
use crate::models::profile::requests::HypothesizeRequest;
use crate::models::profile::responses::HypothesizeResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_hypothesize(
    service: &ProfileService,
    request: &HttpRequest,
    req: HypothesizeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let rows = match student_rows(storage.as_ref(), &user).await {
        Ok(rows) => rows,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load assignments: {e}"),
                )),
            );
        }
    };

    let inputs: Vec<HypothesisRow> = rows
        .iter()
        .map(|row| HypothesisRow {
            status: row.status,
            weight: row.assignment.weight,
            hypothetical: req.scores.get(&row.assignment.id).copied(),
        })
        .collect();

    let used: HashSet<i64> = rows
        .iter()
        .zip(&inputs)
        .filter(|(_, input)| input.uses_hypothetical())
        .map(|(row, _)| row.assignment.id)
        .collect();
    let mut ignored: Vec<i64> = req
        .scores
        .keys()
        .copied()
        .filter(|id| !used.contains(id))
        .collect();
    ignored.sort_unstable();

    let response = HypothesizeResponse {
        hypothesized_grade: hypothesize(&inputs),
        ignored_assignment_ids: ignored,
        assignments: rows.iter().map(|row| row.to_profile_row()).collect(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Hypothesized grade")))
}
