pub mod assignments;
pub mod auth;
pub mod profile;
pub mod submissions;
pub mod uploads;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use profile::ProfileService;
pub use submissions::SubmissionService;
pub use uploads::UploadService;
pub use users::UserService;
