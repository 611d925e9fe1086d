use crate::models::common::string_enum;
use crate::models::users::entities::UserType;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 报表类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum ReportType {
    AttendanceSummary,
    StudentAttendance,
    ClassAttendance,
    InstructorReport,
    DepartmentReport,
    MonthlySummary,
    Custom,
}

string_enum!(ReportType, "report type", {
    AttendanceSummary => "attendance_summary",
    StudentAttendance => "student_attendance",
    ClassAttendance => "class_attendance",
    InstructorReport => "instructor_report",
    DepartmentReport => "department_report",
    MonthlySummary => "monthly_summary",
    Custom => "custom",
});

// 导出格式
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum FileFormat {
    Pdf,
    Excel,
    Csv,
    Html,
}

string_enum!(FileFormat, "file format", {
    Pdf => "pdf",
    Excel => "excel",
    Csv => "csv",
    Html => "html",
});

// 首页组件类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum WidgetType {
    AttendanceChart,
    StudentStats,
    ClassStats,
    InstructorStats,
    RecentActivity,
    Calendar,
    QuickLinks,
}

string_enum!(WidgetType, "widget type", {
    AttendanceChart => "attendance_chart",
    StudentStats => "student_stats",
    ClassStats => "class_stats",
    InstructorStats => "instructor_stats",
    RecentActivity => "recent_activity",
    Calendar => "calendar",
    QuickLinks => "quick_links",
});

// 图表类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Doughnut,
    Radar,
}

string_enum!(ChartType, "chart type", {
    Bar => "bar",
    Line => "line",
    Pie => "pie",
    Doughnut => "doughnut",
    Radar => "radar",
});

// 定时报表频率
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum ScheduleFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

string_enum!(ScheduleFrequency, "frequency", {
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
    Yearly => "yearly",
    Custom => "custom",
});

// 报表模板
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportTemplate {
    pub id: i64,
    pub name: String,
    pub report_type: ReportType,
    pub description: String,
    pub parameters: serde_json::Value,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 已保存报表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct GeneratedReport {
    pub id: i64,
    pub template_id: Option<i64>,
    pub report_type: ReportType,
    pub report_name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub data: serde_json::Value,
    pub summary: serde_json::Value,
    pub file_format: FileFormat,
    pub file_size: i64,
    pub generated_by: Option<i64>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub is_ready: bool,
    pub is_archived: bool,
}

// 首页组件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct DashboardWidget {
    pub id: i64,
    pub name: String,
    pub widget_type: WidgetType,
    pub chart_type: Option<ChartType>,
    pub description: String,
    pub configuration: serde_json::Value,
    pub refresh_interval: i32,
    pub width: i32,
    pub height: i32,
    pub is_active: bool,
    pub display_order: i32,
    pub user_types: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl DashboardWidget {
    pub fn is_visible_to(&self, user_type: &UserType) -> bool {
        let wanted = user_type.to_string();
        self.user_types.iter().any(|t| *t == wanted)
    }

    /// 配置中的整数项，缺省时返回 default
    pub fn config_i64(&self, key: &str, default: i64) -> i64 {
        self.configuration
            .get(key)
            .and_then(|v| v.as_i64())
            .unwrap_or(default)
    }
}

/// 解析组件可见的用户类型
///
/// 正常存储为 JSON 数组，兼容旧数据中的逗号分隔字符串。
pub fn parse_user_types(raw: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return list;
    }
    raw.trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|t| t.trim().trim_matches('"').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

// 定时报表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportSchedule {
    pub id: i64,
    pub name: String,
    pub template_id: i64,
    pub frequency: ScheduleFrequency,
    pub day_of_week: Option<i32>,
    pub day_of_month: Option<i32>,
    pub hour: i32,
    pub minute: i32,
    pub email_recipients: Vec<String>,
    pub notify_users: Vec<i64>,
    pub output_formats: Vec<FileFormat>,
    pub is_active: bool,
    pub last_run: Option<chrono::DateTime<chrono::Utc>>,
    pub next_run: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_types_json() {
        assert_eq!(
            parse_user_types(r#"["admin","instructor"]"#),
            vec!["admin".to_string(), "instructor".to_string()]
        );
    }

    #[test]
    fn test_parse_user_types_legacy_comma_list() {
        assert_eq!(
            parse_user_types("admin, registrar ,hod"),
            vec![
                "admin".to_string(),
                "registrar".to_string(),
                "hod".to_string()
            ]
        );
        assert!(parse_user_types("").is_empty());
    }

    #[test]
    fn test_widget_visibility() {
        let now = chrono::Utc::now();
        let widget = DashboardWidget {
            id: 1,
            name: "Student Statistics".to_string(),
            widget_type: WidgetType::StudentStats,
            chart_type: None,
            description: String::new(),
            configuration: serde_json::json!({"days": 14}),
            refresh_interval: 300,
            width: 4,
            height: 300,
            is_active: true,
            display_order: 1,
            user_types: vec!["admin".to_string(), "hod".to_string()],
            created_at: now,
            updated_at: now,
        };
        assert!(widget.is_visible_to(&UserType::Hod));
        assert!(!widget.is_visible_to(&UserType::Student));
        assert_eq!(widget.config_i64("days", 7), 14);
        assert_eq!(widget.config_i64("limit", 5), 5);
    }
}
