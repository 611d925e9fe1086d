use crate::models::attendance::entities::{AttendanceSession, AttendanceSummary};
use crate::models::classes::entities::Class;
use crate::models::common::PaginationInfo;
use crate::models::students::entities::{
    AcademicRecord, Enrollment, Gender, Student, StudentStatus,
};
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 学生考勤统计
#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentAttendanceStats {
    pub total_sessions: u64,
    pub present: u64,
    pub late: u64,
    pub absent: u64,
    pub excused: u64,
    pub half_day: u64,
    pub attendance_rate: f64,
}

// 学生列表项：档案 + 姓名
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub full_name: String,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<StudentListItem>,
    pub pagination: PaginationInfo,
}

// 选课记录 + 班级信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct EnrollmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: Enrollment,
    pub class: Option<Class>,
}

// 学生详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentDetailResponse {
    pub student: Student,
    pub user: User,
    pub enrollments: Vec<EnrollmentDetail>,
}

// 创建学生响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentResponse {
    pub student: Student,
    pub user: User,
    /// 仅在自动生成密码时返回
    pub generated_password: Option<String>,
}

// 学生个人主页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentDashboardResponse {
    pub student: Student,
    pub user: User,
    pub enrollments: Vec<EnrollmentDetail>,
    pub stats: StudentAttendanceStats,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct AcademicRecordListResponse {
    pub items: Vec<AcademicRecord>,
}

// 班级花名册中的一名学生，统计范围为本月已结束的课次
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct ClassRosterItem {
    pub enrollment: Enrollment,
    pub student_id: i64,
    pub admission_number: String,
    pub student_name: String,
    pub gender: Gender,
    pub status: StudentStatus,
    pub stats: StudentAttendanceStats,
    pub punctuality_rate: f64,
    /// 本月最近一次出勤（含迟到、半天）的课次日期
    pub last_attendance_date: Option<chrono::NaiveDate>,
    pub monthly_summary: Option<AttendanceSummary>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct GenderCounts {
    pub male: u64,
    pub female: u64,
    pub other: u64,
}

// 某天已结束课次的平均出勤率；当天没有课次时为空
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct RosterTrendPoint {
    pub date: chrono::NaiveDate,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct ClassRosterResponse {
    pub class: Class,
    pub month_start: chrono::NaiveDate,
    pub month_end: chrono::NaiveDate,
    pub total_students: u64,
    pub present_today: i32,
    pub late_today: i32,
    pub absent_today: i32,
    pub gender_counts: GenderCounts,
    pub average_attendance: f64,
    pub average_punctuality: f64,
    pub recent_sessions: Vec<AttendanceSession>,
    /// 最近 5 天，今天在前
    pub trend: Vec<RosterTrendPoint>,
    pub items: Vec<ClassRosterItem>,
    pub pagination: PaginationInfo,
}

// 学生本人的选课及各班出勤
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentClassItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub detail: EnrollmentDetail,
    pub present_count: u64,
    pub late_count: u64,
    pub absent_count: u64,
    /// (出勤 + 迟到) / 全部记录
    pub attendance_percentage: f64,
    pub next_session: Option<AttendanceSession>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentClassesResponse {
    pub items: Vec<StudentClassItem>,
    pub average_attendance: f64,
    /// 所选班级今天及以后尚未开始的课次数
    pub upcoming_sessions: u64,
}
