use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::UploadService;
use crate::utils::SafeFileName;

// 懒加载的全局 UploadService 实例
static UPLOAD_SERVICE: Lazy<UploadService> = Lazy::new(UploadService::new_lazy);

pub async fn download(request: HttpRequest, filename: SafeFileName) -> ActixResult<HttpResponse> {
    UPLOAD_SERVICE.download(&request, filename.0).await
}

// 配置路由
pub fn configure_upload_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/uploads")
            .wrap(middlewares::RequireJWT)
            .route("/{filename}", web::get().to(download)),
    );
}
