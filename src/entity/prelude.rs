//! 预导入模块，方便使用

pub use super::academic_records::{
    ActiveModel as AcademicRecordActiveModel, Entity as AcademicRecords,
    Model as AcademicRecordModel,
};
pub use super::attendance_records::{
    ActiveModel as AttendanceRecordActiveModel, Entity as AttendanceRecords,
    Model as AttendanceRecordModel,
};
pub use super::attendance_sessions::{
    ActiveModel as AttendanceSessionActiveModel, Entity as AttendanceSessions,
    Model as AttendanceSessionModel,
};
pub use super::attendance_summaries::{
    ActiveModel as AttendanceSummaryActiveModel, Entity as AttendanceSummaries,
    Model as AttendanceSummaryModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::courses::{
    ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel,
};
pub use super::dashboard_widgets::{
    ActiveModel as DashboardWidgetActiveModel, Entity as DashboardWidgets,
    Model as DashboardWidgetModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::excuse_applications::{
    ActiveModel as ExcuseApplicationActiveModel, Entity as ExcuseApplications,
    Model as ExcuseApplicationModel,
};
pub use super::generated_reports::{
    ActiveModel as GeneratedReportActiveModel, Entity as GeneratedReports,
    Model as GeneratedReportModel,
};
pub use super::report_schedules::{
    ActiveModel as ReportScheduleActiveModel, Entity as ReportSchedules,
    Model as ReportScheduleModel,
};
pub use super::report_templates::{
    ActiveModel as ReportTemplateActiveModel, Entity as ReportTemplates,
    Model as ReportTemplateModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
