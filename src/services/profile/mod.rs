pub mod hypothesize;
pub mod summary;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::profile::requests::{HypothesizeRequest, UpdateProfileRequest};
use crate::storage::Storage;

pub struct ProfileService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProfileService {
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

    // 个人主页汇总
    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        summary::get_profile(self, request).await
    }

    // 修改个人资料
    pub async fn update_profile(
        &self,
        request: &HttpRequest,
        update: UpdateProfileRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_profile(self, update, request).await
    }

    // 假设成绩
    pub async fn hypothesize(
        &self,
        request: &HttpRequest,
        req: HypothesizeRequest,
    ) -> ActixResult<HttpResponse> {
        hypothesize::handle_hypothesize(self, request, req).await
    }
}
