use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::submissions::requests::GradeForm;
use crate::models::users::entities::UserType;
use crate::services::{AssignmentService, SubmissionService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, body.into_inner())
        .await
}

pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, id.0).await
}

pub async fn list_submissions(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_submissions(&req, id.0).await
}

// JSON 与 urlencoded 表单都接受
pub async fn grade_submissions(
    req: HttpRequest,
    id: SafeIDI64,
    form: web::Either<web::Json<GradeForm>, web::Form<GradeForm>>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submissions(&req, id.0, form.into_inner())
        .await
}

pub async fn submit(
    req: HttpRequest,
    id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.submit(&req, id.0, payload).await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 所有登录用户可查看作业列表
                    .route(web::get().to(list_assignments))
                    // 仅管理员可布置作业
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(RequireRole::new(UserType::Admin)),
                    ),
            )
            // 详情内容按身份区分，在业务层处理
            .service(web::resource("/{id}").route(web::get().to(get_assignment)))
            .service(
                web::resource("/{id}/submissions")
                    .route(web::get().to(list_submissions))
                    .wrap(RequireRole::new_any(UserType::staff_types())),
            )
            .service(
                web::resource("/{id}/grade")
                    .route(web::post().to(grade_submissions))
                    .wrap(RequireRole::new_any(UserType::staff_types())),
            )
            .service(
                web::resource("/{id}/submit").route(
                    web::post()
                        .to(submit)
                        // 先校验身份，再按用户计数
                        .wrap(RateLimit::submission())
                        .wrap(RequireRole::new_any(UserType::student_types())),
                ),
            ),
    );
}
