pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod courses;
pub mod excuses;
pub mod reports;
pub mod students;
pub mod system;
pub mod users;

use serde::Serialize;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间，用于计算运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 按千位分段：1xxx 通用，2xxx 认证，3xxx 用户，4xxx 学生，
/// 5xxx 课程与班级，6xxx 考勤，7xxx 请假，8xxx 报表。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1002,
    Conflict = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,
    ExportFailed = 1006,

    // 认证
    Unauthorized = 2000,
    AuthFailed = 2001,
    AccountNotApproved = 2002,
    AccountInactive = 2003,
    PermissionDenied = 2005,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    CannotModifySelf = 3007,
    RejectionReasonRequired = 3008,
    UserNameAlreadyExists = 3009,
    UserEmailAlreadyExists = 3010,

    // 学生
    StudentNotFound = 4000,
    StudentAlreadyExists = 4001,
    StudentProfileMissing = 4002,
    EnrollmentNotFound = 4003,
    EnrollmentAlreadyExists = 4004,
    ClassFull = 4005,
    AcademicRecordInvalid = 4006,

    // 课程与班级
    CourseNotFound = 5000,
    CourseAlreadyExists = 5001,
    ClassNotFound = 5002,
    ClassAlreadyExists = 5003,
    ClassPermissionDenied = 5004,
    InstructorInvalid = 5005,

    // 考勤
    SessionNotFound = 6000,
    SessionAlreadyExists = 6001,
    SessionStateInvalid = 6002,
    RecordNotFound = 6003,
    AttendanceStatusInvalid = 6004,
    QrCodeInvalid = 6005,
    QrCodeExpired = 6006,
    NotEnrolled = 6007,
    SessionPermissionDenied = 6008,

    // 请假
    ExcuseNotFound = 7000,
    ExcuseInvalid = 7001,
    ExcuseAlreadyReviewed = 7002,
    ExcusePermissionDenied = 7003,

    // 报表
    ReportNotFound = 8000,
    ReportPermissionDenied = 8001,
    WidgetNotFound = 8002,
    WidgetAccessDenied = 8003,
    TemplateNotFound = 8004,
    ScheduleNotFound = 8005,
    ScheduleInvalid = 8006,
    ExportFormatUnsupported = 8007,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 2000);
        assert_eq!(ErrorCode::QrCodeExpired as i32, 6006);
        assert!((7000..8000).contains(&(ErrorCode::ExcuseAlreadyReviewed as i32)));
    }
}
