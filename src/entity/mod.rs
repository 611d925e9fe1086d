//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_records;
pub mod attendance_records;
pub mod attendance_sessions;
pub mod attendance_summaries;
pub mod classes;
pub mod courses;
pub mod dashboard_widgets;
pub mod enrollments;
pub mod excuse_applications;
pub mod generated_reports;
pub mod report_schedules;
pub mod report_templates;
pub mod students;
pub mod users;
