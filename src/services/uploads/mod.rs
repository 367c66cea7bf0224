pub mod download;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct UploadService {
    storage: Option<Arc<dyn Storage>>,
}

impl UploadService {
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

    // 下载提交文件
    pub async fn download(
        &self,
        request: &HttpRequest,
        filename: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, filename).await
    }
}
