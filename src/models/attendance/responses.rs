use crate::models::attendance::entities::{
    AttendanceRecord, AttendanceSession, AttendanceSummary,
};
use crate::models::classes::entities::Class;
use crate::models::common::PaginationInfo;
use crate::models::students::entities::Student;
use serde::Serialize;
use ts_rs::TS;

// 各状态计数
#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StatusCounts {
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    pub half_day: u64,
}

// 考勤记录 + 关联信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: AttendanceRecord,
    pub admission_number: String,
    pub student_name: String,
    pub class_id: i64,
    pub class_name: String,
    pub session_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub marked_by_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionListResponse {
    pub items: Vec<AttendanceSession>,
    pub pagination: PaginationInfo,
}

// 课次详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionDetailResponse {
    pub session: AttendanceSession,
    pub class: Option<Class>,
    pub records: Vec<RecordDetail>,
    pub counts: StatusCounts,
    pub is_active: bool,
}

// 二维码信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct QrCodeResponse {
    pub session_id: i64,
    pub qr_code_data: String,
    pub qr_code_expiry: Option<chrono::DateTime<chrono::Utc>>,
    pub is_expired: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkMarkResponse {
    pub updated: u64,
    pub skipped: Vec<i64>,
    pub session: AttendanceSession,
}

// 学生考勤历史
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentHistoryResponse {
    pub student: Student,
    pub items: Vec<RecordDetail>,
    pub pagination: PaginationInfo,
    pub total_sessions: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub attendance_rate: f64,
}

// 考勤筛选结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct FilterReportResponse {
    pub date_range: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub items: Vec<RecordDetail>,
    pub counts: StatusCounts,
    pub attendance_rate: f64,
}

// 考勤首页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceDashboardResponse {
    pub active_sessions: Vec<AttendanceSession>,
    pub today_sessions: Vec<AttendanceSession>,
    pub upcoming_sessions: Vec<AttendanceSession>,
    pub today_present: u64,
    pub today_absent: u64,
    pub today_late: u64,
    /// 仅学生用户返回
    pub recent_attendance: Option<Vec<RecordDetail>>,
    pub attendance_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SummaryListResponse {
    pub items: Vec<AttendanceSummary>,
}
