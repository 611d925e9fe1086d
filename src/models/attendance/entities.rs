use crate::models::common::string_enum;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课次状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum SessionStatus {
    Scheduled, // 已排课
    Ongoing,   // 进行中
    Completed, // 已结束
    Cancelled, // 已取消
}

string_enum!(SessionStatus, "session status", {
    Scheduled => "scheduled",
    Ongoing => "ongoing",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl SessionStatus {
    /// 允许的状态迁移：scheduled → ongoing → completed，未结束前可取消
    pub fn can_transition_to(&self, next: &SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Scheduled, SessionStatus::Ongoing)
                | (SessionStatus::Ongoing, SessionStatus::Completed)
                | (SessionStatus::Scheduled, SessionStatus::Cancelled)
                | (SessionStatus::Ongoing, SessionStatus::Cancelled)
        )
    }
}

// 点名方式
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceMethod {
    QrCode,
    Manual,
    Biometric,
    Mobile,
}

string_enum!(AttendanceMethod, "attendance method", {
    QrCode => "qr_code",
    Manual => "manual",
    Biometric => "biometric",
    Mobile => "mobile",
});

// 出勤状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
    HalfDay,
}

string_enum!(AttendanceStatus, "attendance status", {
    Present => "present",
    Absent => "absent",
    Late => "late",
    Excused => "excused",
    HalfDay => "half_day",
});

impl AttendanceStatus {
    /// 需要记录签到时间的状态
    pub fn is_checked_in(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Excused => "Excused",
            AttendanceStatus::HalfDay => "Half Day",
        }
    }
}

// 汇总周期
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum PeriodType {
    Weekly,
    Monthly,
}

string_enum!(PeriodType, "period type", { Weekly => "weekly", Monthly => "monthly" });

// 出勤率趋势
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

string_enum!(Trend, "trend", { Up => "up", Down => "down", Stable => "stable" });

// 考勤课次
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSession {
    pub id: i64,
    pub class_id: i64,
    pub instructor_id: i64,
    pub session_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub topic_covered: String,
    pub venue: String,
    pub attendance_method: AttendanceMethod,
    // 二维码只通过专门接口下发
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub qr_code_data: Option<String>,
    pub qr_code_expiry: Option<chrono::DateTime<chrono::Utc>>,
    pub status: SessionStatus,
    pub total_present: i32,
    pub total_absent: i32,
    pub total_late: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AttendanceSession {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.instructor_id == user_id
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub check_in_time: Option<chrono::DateTime<chrono::Utc>>,
    pub check_out_time: Option<chrono::DateTime<chrono::Utc>>,
    pub mark_time: chrono::DateTime<chrono::Utc>,
    pub marked_by: Option<i64>,
    pub is_excused: bool,
    pub excuse_reason: String,
    pub remarks: String,
    pub late_minutes: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 周期考勤汇总
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub id: i64,
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
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_transitions() {
        use SessionStatus::*;
        assert!(Scheduled.can_transition_to(&Ongoing));
        assert!(Ongoing.can_transition_to(&Completed));
        assert!(Scheduled.can_transition_to(&Cancelled));
        assert!(Ongoing.can_transition_to(&Cancelled));

        assert!(!Scheduled.can_transition_to(&Completed));
        assert!(!Completed.can_transition_to(&Ongoing));
        assert!(!Cancelled.can_transition_to(&Scheduled));
        assert!(!Completed.can_transition_to(&Cancelled));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "half_day");
        assert_eq!(
            "qr_code".parse::<AttendanceMethod>().unwrap(),
            AttendanceMethod::QrCode
        );
        assert!("sleeping".parse::<AttendanceStatus>().is_err());
        let s: AttendanceStatus = serde_json::from_str("\"late\"").unwrap();
        assert_eq!(s, AttendanceStatus::Late);
    }

    #[test]
    fn test_checked_in_statuses() {
        assert!(AttendanceStatus::Present.is_checked_in());
        assert!(AttendanceStatus::Late.is_checked_in());
        assert!(!AttendanceStatus::Absent.is_checked_in());
        assert!(!AttendanceStatus::Excused.is_checked_in());
    }
}
