pub mod clock;
pub mod export;
pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeClassIdI64, SafeEnrollmentIdI64, SafeIDI64, SafeRecordIdI64, SafeSessionIdI64,
    SafeStudentIdI64, SafeWidgetIdI64,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{contains_pattern, escape_like_pattern};
