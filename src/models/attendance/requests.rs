use std::collections::HashMap;

use crate::models::attendance::entities::{
    AttendanceMethod, AttendanceStatus, PeriodType, SessionStatus, Trend,
};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

// 课次查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    pub status: Option<SessionStatus>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
}

fn default_method() -> AttendanceMethod {
    AttendanceMethod::Manual
}

// 创建课次请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CreateSessionRequest {
    pub class_id: i64,
    pub session_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    #[serde(default)]
    pub topic_covered: String,
    /// 为空时沿用班级教室
    pub venue: Option<String>,
    #[serde(default = "default_method")]
    pub attendance_method: AttendanceMethod,
}

impl CreateSessionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.start_time >= self.end_time {
            return Err("End time must be after start time");
        }
        if self.topic_covered.len() > 200 {
            return Err("Topic must be at most 200 characters");
        }
        Ok(())
    }
}

// 单个学生点名
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub student_id: i64,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub is_excused: bool,
}

// 批量点名：student_id → status
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkMarkRequest {
    pub statuses: HashMap<i64, AttendanceStatus>,
    #[serde(default)]
    pub remarks: HashMap<i64, String>,
}

// 修改单条记录状态（前端下拉框直接提交）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct UpdateRecordStatusRequest {
    pub status: String,
    pub remarks: Option<String>,
}

// 扫码签到
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct QrCheckInRequest {
    pub code: String,
    /// 仅教职工代签时使用
    pub student_id: Option<i64>,
}

// 考勤历史查询
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct HistoryQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
}

// 考勤筛选
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceFilterParams {
    pub date_range: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<AttendanceStatus>,
}

// 生成周期汇总
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct GenerateSummaryRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub period_type: PeriodType,
    pub period_start: chrono::NaiveDate,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SummaryQueryParams {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
}

// 课次列表查询（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct SessionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub class_ids: Option<Vec<i64>>,
    pub status: Option<SessionStatus>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    /// 按日期、开始时间升序（默认降序）
    pub ascending: bool,
}

// 考勤记录筛选（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub session_id: Option<i64>,
    pub class_id: Option<i64>,
    pub class_ids: Option<Vec<i64>>,
    pub instructor_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    /// 只统计指定状态的课次
    pub session_status: Option<SessionStatus>,
    pub is_excused: Option<bool>,
    /// 按日期、学号升序（导出用）；默认按日期、签到时间倒序
    pub chronological: bool,
    pub limit: Option<u64>,
}

// 新建课次（用于存储层）
#[derive(Debug, Clone)]
pub struct NewSession {
    pub class_id: i64,
    pub instructor_id: i64,
    pub session_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub topic_covered: String,
    pub venue: String,
    pub attendance_method: AttendanceMethod,
    pub qr_code_data: Option<String>,
    pub qr_code_expiry: Option<i64>,
}

// 周期汇总写入（按 student/class/period_type/period_start 唯一）
#[derive(Debug, Clone)]
pub struct SummaryWrite {
    pub student_id: i64,
    pub class_id: i64,
    pub period_type: PeriodType,
    pub period_start: chrono::NaiveDate,
    pub period_end: chrono::NaiveDate,
    pub total_sessions: i32,
    pub present_count: i32,
    pub absent_count: i32,
    pub late_count: i32,
    pub excused_count: i32,
    pub attendance_rate: f64,
    pub punctuality_rate: f64,
    pub previous_period_rate: Option<f64>,
    pub trend: Trend,
}

/// 写入考勤记录的字段（不存在则创建）
#[derive(Debug, Clone)]
pub struct RecordWrite {
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub check_in_time: Option<i64>,
    pub marked_by: Option<i64>,
    pub is_excused: Option<bool>,
    pub remarks: Option<String>,
    pub late_minutes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_defaults_to_manual() {
        let req: CreateSessionRequest = serde_json::from_str(
            r#"{"class_id":3,"session_date":"2025-02-03","start_time":"08:00:00","end_time":"10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(req.attendance_method, AttendanceMethod::Manual);
        assert!(req.venue.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_session_rejects_inverted_times() {
        let req: CreateSessionRequest = serde_json::from_str(
            r#"{"class_id":3,"session_date":"2025-02-03","start_time":"10:00:00","end_time":"10:00:00"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_bulk_mark_string_keys() {
        let req: BulkMarkRequest =
            serde_json::from_str(r#"{"statuses":{"12":"present","15":"late"}}"#).unwrap();
        assert_eq!(req.statuses.get(&12), Some(&AttendanceStatus::Present));
        assert_eq!(req.statuses.get(&15), Some(&AttendanceStatus::Late));
        assert!(req.remarks.is_empty());
    }
}
