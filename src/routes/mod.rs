pub mod assignments;

pub mod auth;

pub mod profile;

pub mod uploads;

pub mod users;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use profile::configure_profile_routes;
pub use uploads::configure_upload_routes;
pub use users::configure_user_routes;

use actix_web::web;

// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_assignments_routes(cfg);
    configure_profile_routes(cfg);
    configure_user_routes(cfg);
    configure_upload_routes(cfg);
}
