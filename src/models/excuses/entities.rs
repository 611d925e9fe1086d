use crate::models::common::string_enum;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 请假申请状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub enum ExcuseStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

string_enum!(ExcuseStatus, "excuse status", {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

// 请假申请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub struct ExcuseApplication {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub attendance_session_id: Option<i64>,
    pub reason: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub status: ExcuseStatus,
    pub reviewed_by: Option<i64>,
    pub review_notes: String,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ExcuseApplication {
    pub fn is_pending(&self) -> bool {
        self.status == ExcuseStatus::Pending
    }
}
