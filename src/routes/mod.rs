pub mod accounts;

pub mod attendance;

pub mod auth;

pub mod classes;

pub mod courses;

pub mod excuses;

pub mod reports;

pub mod students;

pub mod system;

pub use accounts::configure_account_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use courses::configure_course_routes;
pub use excuses::configure_excuse_routes;
pub use reports::configure_report_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
