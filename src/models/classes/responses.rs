use super::entities::Class;
use crate::models::attendance::entities::AttendanceSession;
use crate::models::common::PaginationInfo;
use crate::models::courses::entities::Course;
use crate::models::students::entities::Enrollment;
use crate::models::students::responses::StudentAttendanceStats;
use crate::models::users::responses::InstructorOption;
use serde::Serialize;
use ts_rs::TS;

// 班级列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Class>,
}

// 班级详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetailResponse {
    pub class: Class,
    pub course: Option<Course>,
    pub instructor: Option<InstructorOption>,
    pub enrolled_count: u64,
}

// 班级学生及出勤统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassStudentItem {
    pub enrollment: Enrollment,
    pub student_id: i64,
    pub admission_number: String,
    pub student_name: String,
    pub stats: StudentAttendanceStats,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassStudentsResponse {
    pub class: Class,
    pub total_sessions: u64,
    pub items: Vec<ClassStudentItem>,
}

// 批量选课结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct SkippedEnrollment {
    pub student_id: i64,
    pub reason: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct EnrollStudentsResponse {
    pub enrolled: Vec<i64>,
    pub skipped: Vec<SkippedEnrollment>,
}

// 教师的班级列表项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct InstructorClassItem {
    pub class: Class,
    pub student_count: u64,
    pub today_session: bool,
    pub total_sessions: u64,
    /// 今天及以后的第一节课
    pub next_session: Option<AttendanceSession>,
    /// 全部记录中出勤状态的占比
    pub attendance_rate: f64,
}
