pub mod grade;
pub mod list;
pub mod submit;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::GradeForm;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 批改列表
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, assignment_id).await
    }

    // 批量打分
    pub async fn grade_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        form: GradeForm,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submissions(self, request, assignment_id, form).await
    }

    // 学生上传作业
    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        submit::handle_submit(self, request, assignment_id, payload).await
    }
}
