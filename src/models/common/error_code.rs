/// 业务错误码
///
/// 按模块分段：1xxx 通用，2xxx 认证与用户，3xxx 作业，4xxx 提交与评分，5xxx 文件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserEmailInvalid = 2003,
    UserEmailAlreadyExists = 2004,
    UserPasswordInvalid = 2005,
    UserNameInvalid = 2006,
    UserUpdateFailed = 2007,
    UserInactive = 2008,

    AssignmentNotFound = 3000,
    AssignmentCreateFailed = 3001,
    AssignmentPastDue = 3002,
    AssignmentInvalid = 3003,

    SubmissionNotFound = 4000,
    SubmissionAlreadyExists = 4001,
    ScoreOutOfRange = 4002,
    NotStudent = 4003,

    FileNotFound = 5000,
    FileUploadFailed = 5001,
    FileTypeNotAllowed = 5002,
    FileSizeExceeded = 5003,
    MultifileUploadNotAllowed = 5004,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AssignmentPastDue as i32, 3002);
        assert_eq!(ErrorCode::ScoreOutOfRange as i32, 4002);
    }
}
