use crate::models::common::string_enum;
use crate::models::reports::entities::{
    ChartType, FileFormat, ReportType, ScheduleFrequency, WidgetType,
};
use crate::models::users::entities::UserType;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 日期范围预设
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum DateRangePreset {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    Custom,
}

string_enum!(DateRangePreset, "date range", {
    Today => "today",
    Yesterday => "yesterday",
    ThisWeek => "this_week",
    LastWeek => "last_week",
    ThisMonth => "this_month",
    LastMonth => "last_month",
    Custom => "custom",
});

// 报表分组方式
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum GroupBy {
    Day,
    Week,
    Month,
    Class,
    Instructor,
    Student,
}

string_enum!(GroupBy, "group by", {
    Day => "day",
    Week => "week",
    Month => "month",
    Class => "class",
    Instructor => "instructor",
    Student => "student",
});

impl GroupBy {
    /// 按时间分桶（其余按实体分组）
    pub fn is_time_based(&self) -> bool {
        matches!(self, GroupBy::Day | GroupBy::Week | GroupBy::Month)
    }
}

// 可导出的报表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Attendance,
    Student,
    Class,
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attendance" => Ok(ExportKind::Attendance),
            "student" => Ok(ExportKind::Student),
            "class" => Ok(ExportKind::Class),
            _ => Err(format!("Invalid report type: {s}")),
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Attendance => write!(f, "attendance"),
            ExportKind::Student => write!(f, "student"),
            ExportKind::Class => write!(f, "class"),
        }
    }
}

// 考勤报表参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AttendanceReportParams {
    pub date_range: Option<DateRangePreset>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub group_by: Option<GroupBy>,
}

// 学生考勤报表参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentReportParams {
    pub date_range: Option<DateRangePreset>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
}

// 班级考勤报表参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassReportParams {
    pub date_range: Option<DateRangePreset>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub class_id: Option<i64>,
    pub instructor_id: Option<i64>,
}

// 导出参数，合并三类报表的筛选条件
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ExportReportParams {
    pub format: FileFormat,
    pub date_range: Option<DateRangePreset>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct QuickReportParams {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

// 保存报表
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SaveReportRequest {
    pub report_name: String,
    pub report_type: ReportType,
    pub template_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub summary: serde_json::Value,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub file_format: Option<FileFormat>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SavedReportQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub include_archived: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct SavedReportListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub generated_by: Option<i64>,
    pub include_archived: bool,
}

fn default_true() -> bool {
    true
}

// 报表模板
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub report_type: ReportType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub report_type: Option<ReportType>,
    pub description: Option<String>,
    pub parameters: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

fn default_refresh_interval() -> i32 {
    300
}

fn default_width() -> i32 {
    4
}

fn default_height() -> i32 {
    300
}

/// 组件宽度按 12 栅格计算
pub fn validate_widget_layout(width: i32, user_types: &[String]) -> Result<(), String> {
    if !(1..=12).contains(&width) {
        return Err("Width must be between 1 and 12".to_string());
    }
    if user_types.is_empty() {
        return Err("At least one user type is required".to_string());
    }
    for t in user_types {
        t.parse::<UserType>()
            .map_err(|_| format!("Invalid user type: {t}"))?;
    }
    Ok(())
}

// 首页组件
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CreateWidgetRequest {
    pub name: String,
    pub widget_type: WidgetType,
    pub chart_type: Option<ChartType>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub configuration: serde_json::Value,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: i32,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
    pub user_types: Vec<String>,
}

impl CreateWidgetRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Widget name is required".to_string());
        }
        if self.refresh_interval < 0 || self.height < 1 {
            return Err("Refresh interval and height must be positive".to_string());
        }
        validate_widget_layout(self.width, &self.user_types)
    }
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct UpdateWidgetRequest {
    pub name: Option<String>,
    pub widget_type: Option<WidgetType>,
    pub chart_type: Option<ChartType>,
    pub description: Option<String>,
    pub configuration: Option<serde_json::Value>,
    pub refresh_interval: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
    pub user_types: Option<Vec<String>>,
}

fn default_hour() -> i32 {
    9
}

// 定时报表
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CreateScheduleRequest {
    pub name: String,
    pub template_id: i64,
    pub frequency: ScheduleFrequency,
    pub day_of_week: Option<i32>,
    pub day_of_month: Option<i32>,
    #[serde(default = "default_hour")]
    pub hour: i32,
    #[serde(default)]
    pub minute: i32,
    #[serde(default)]
    pub email_recipients: Vec<String>,
    #[serde(default)]
    pub notify_users: Vec<i64>,
    #[serde(default)]
    pub output_formats: Vec<FileFormat>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// 定时参数校验，创建与更新共用
pub fn validate_schedule_timing(
    frequency: ScheduleFrequency,
    day_of_week: Option<i32>,
    day_of_month: Option<i32>,
    hour: i32,
    minute: i32,
) -> Result<(), &'static str> {
    if !(0..=23).contains(&hour) {
        return Err("Hour must be between 0 and 23");
    }
    if !(0..=59).contains(&minute) {
        return Err("Minute must be between 0 and 59");
    }
    if day_of_week.is_some_and(|d| !(0..=6).contains(&d)) {
        return Err("Day of week must be between 0 (Monday) and 6 (Sunday)");
    }
    if day_of_month.is_some_and(|d| !(1..=31).contains(&d)) {
        return Err("Day of month must be between 1 and 31");
    }
    match frequency {
        ScheduleFrequency::Weekly if day_of_week.is_none() => {
            Err("Weekly schedules require a day of week")
        }
        ScheduleFrequency::Monthly if day_of_month.is_none() => {
            Err("Monthly schedules require a day of month")
        }
        _ => Ok(()),
    }
}

impl CreateScheduleRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Schedule name is required");
        }
        validate_schedule_timing(
            self.frequency,
            self.day_of_week,
            self.day_of_month,
            self.hour,
            self.minute,
        )
    }
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct UpdateScheduleRequest {
    pub name: Option<String>,
    pub template_id: Option<i64>,
    pub frequency: Option<ScheduleFrequency>,
    pub day_of_week: Option<i32>,
    pub day_of_month: Option<i32>,
    pub hour: Option<i32>,
    pub minute: Option<i32>,
    pub email_recipients: Option<Vec<String>>,
    pub notify_users: Option<Vec<i64>>,
    pub output_formats: Option<Vec<FileFormat>>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_layout_validation() {
        let types = vec!["admin".to_string()];
        assert!(validate_widget_layout(12, &types).is_ok());
        assert!(validate_widget_layout(0, &types).is_err());
        assert!(validate_widget_layout(13, &types).is_err());
        assert!(validate_widget_layout(4, &[]).is_err());
        assert!(validate_widget_layout(4, &["teacher".to_string()]).is_err());
    }

    #[test]
    fn test_schedule_timing_validation() {
        use ScheduleFrequency::*;
        assert!(validate_schedule_timing(Daily, None, None, 9, 0).is_ok());
        assert!(validate_schedule_timing(Daily, None, None, 24, 0).is_err());
        assert!(validate_schedule_timing(Daily, None, None, 9, 60).is_err());
        assert!(validate_schedule_timing(Weekly, None, None, 9, 0).is_err());
        assert!(validate_schedule_timing(Weekly, Some(7), None, 9, 0).is_err());
        assert!(validate_schedule_timing(Weekly, Some(0), None, 9, 0).is_ok());
        assert!(validate_schedule_timing(Monthly, None, None, 9, 0).is_err());
        assert!(validate_schedule_timing(Monthly, None, Some(31), 9, 0).is_ok());
        assert!(validate_schedule_timing(Monthly, None, Some(0), 9, 0).is_err());
    }

    #[test]
    fn test_export_kind_parse() {
        assert_eq!("class".parse::<ExportKind>().unwrap(), ExportKind::Class);
        assert!("pdf".parse::<ExportKind>().is_err());
    }

    #[test]
    fn test_report_params_from_query() {
        let params: AttendanceReportParams =
            serde_json::from_str(r#"{"date_range":"last_week","group_by":"week"}"#).unwrap();
        assert_eq!(params.date_range, Some(DateRangePreset::LastWeek));
        assert_eq!(params.group_by, Some(GroupBy::Week));
        assert!(GroupBy::Week.is_time_based());
        assert!(!GroupBy::Student.is_time_based());
    }
}
