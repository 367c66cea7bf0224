use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::responses::{AssignmentListItem, AssignmentListResponse};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let now = chrono::Utc::now();

    match storage.list_assignments().await {
        Ok(assignments) => {
            let items = assignments
                .into_iter()
                .map(|assignment| AssignmentListItem {
                    is_due: assignment.is_due_at(now),
                    assignment,
                })
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AssignmentListResponse { items },
                "Assignments retrieved",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list assignments: {e}"),
            )),
        ),
    }
}
