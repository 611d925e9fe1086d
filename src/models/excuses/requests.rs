use crate::models::excuses::entities::ExcuseStatus;
use serde::Deserialize;
use ts_rs::TS;

// 提交请假申请
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub struct ApplyExcuseRequest {
    pub class_id: i64,
    pub attendance_session_id: Option<i64>,
    pub reason: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

impl ApplyExcuseRequest {
    /// `today` 为学校本地日期
    pub fn validate(&self, today: chrono::NaiveDate) -> Result<(), &'static str> {
        if self.reason.trim().is_empty() {
            return Err("Reason is required");
        }
        if self.start_date > self.end_date {
            return Err("End date must be after start date");
        }
        if self.start_date < today {
            return Err("Start date cannot be in the past");
        }
        Ok(())
    }
}

// 审核动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub enum ReviewAction {
    Approve,
    Reject,
}

// 审核请假
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub struct ReviewExcuseRequest {
    pub action: ReviewAction,
    #[serde(default)]
    pub review_notes: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/excuse.ts")]
pub struct ExcuseQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<ExcuseStatus>,
}

// 请假列表查询（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ExcuseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<ExcuseStatus>,
    pub student_id: Option<i64>,
    pub class_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct NewExcuse {
    pub student_id: i64,
    pub class_id: i64,
    pub attendance_session_id: Option<i64>,
    pub reason: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(start: NaiveDate, end: NaiveDate) -> ApplyExcuseRequest {
        ApplyExcuseRequest {
            class_id: 1,
            attendance_session_id: None,
            reason: "Hospital appointment".to_string(),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_apply_excuse_validation() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        assert!(request(today, today).validate(today).is_ok());
        assert!(request(today, tomorrow).validate(today).is_ok());
        assert_eq!(
            request(tomorrow, today).validate(today),
            Err("End date must be after start date")
        );
        assert_eq!(
            request(yesterday, today).validate(today),
            Err("Start date cannot be in the past")
        );
    }

    #[test]
    fn test_review_action_parsing() {
        let req: ReviewExcuseRequest = serde_json::from_str(r#"{"action":"approve"}"#).unwrap();
        assert_eq!(req.action, ReviewAction::Approve);
        assert!(req.review_notes.is_empty());
        assert!(serde_json::from_str::<ReviewExcuseRequest>(r#"{"action":"maybe"}"#).is_err());
    }
}
