use crate::models::common::PaginationInfo;
use crate::models::reports::entities::{
    DashboardWidget, GeneratedReport, ReportSchedule, ReportTemplate,
};
use crate::models::reports::requests::GroupBy;
use serde::Serialize;
use ts_rs::TS;

// 考勤汇总
#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportSummary {
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    pub attendance_rate: f64,
    pub punctuality_rate: f64,
}

/// 报表分组
///
/// 时间分组带 start/end；实体分组带 entity_id。
#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportGroup {
    pub key: String,
    pub label: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub entity_id: Option<i64>,
    /// 班级分组为教师姓名，学生分组为学号
    pub detail: Option<String>,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    pub total: u64,
}

// 图表数据（Chart.js 格式）
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ChartData {
    #[serde(rename = "type")]
    pub chart_type: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AttendanceReportResponse {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub group_by: Option<GroupBy>,
    pub groups: Vec<ReportGroup>,
    pub summary: ReportSummary,
    pub chart: Option<ChartData>,
}

// 学生报表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentReportRow {
    pub student_id: i64,
    pub admission_number: String,
    pub student_name: String,
    pub course: String,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentReportSummary {
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentReportResponse {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub total_sessions: u64,
    pub rows: Vec<StudentReportRow>,
    pub summary: StudentReportSummary,
    pub chart: Option<ChartData>,
}

// 班级报表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassReportRow {
    pub class_id: i64,
    pub class_code: String,
    pub class_name: String,
    pub instructor_name: String,
    pub student_count: u64,
    pub total_sessions: u64,
    pub total_records: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassReportSummary {
    pub total_classes: u64,
    pub total_sessions: u64,
    pub total_records: u64,
    pub total_present: u64,
    pub total_absent: u64,
    pub total_late: u64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassReportResponse {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub rows: Vec<ClassReportRow>,
    pub summary: ClassReportSummary,
    pub chart: Option<ChartData>,
}

// 今日考勤
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct TodayAttendance {
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentStatsData {
    pub total: u64,
    pub active: u64,
    pub male: u64,
    pub female: u64,
    pub inactive: u64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassStatsData {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub instructors: u64,
    /// 今日出勤率，保留 1 位小数
    pub today_attendance: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct InstructorLoad {
    pub name: String,
    pub classes: u64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct InstructorStatsData {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub top_instructors: Vec<InstructorLoad>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ActivityItem {
    pub session_id: i64,
    pub class: String,
    pub date: String,
    pub time: String,
    pub attendance: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct RecentActivityData {
    pub activities: Vec<ActivityItem>,
    pub count: u64,
}

// 组件数据，按组件类型返回不同结构
#[derive(Debug, Clone, Serialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum WidgetData {
    Chart(ChartData),
    StudentStats(StudentStatsData),
    ClassStats(ClassStatsData),
    InstructorStats(InstructorStatsData),
    RecentActivity(RecentActivityData),
    Empty(EmptyData),
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct EmptyData {}

// 报表首页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportsDashboardResponse {
    pub widgets: Vec<DashboardWidget>,
    pub recent_reports: Vec<GeneratedReport>,
    pub today_attendance: TodayAttendance,
    pub student_stats: StudentStatsData,
    pub class_stats: ClassStatsData,
    pub today: chrono::NaiveDate,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CourseCount {
    pub course: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct WeeklyClassAttendance {
    pub class: String,
    pub total_sessions: u64,
    pub present: u64,
    pub total: u64,
    pub rate: f64,
}

// 快速报表
#[derive(Debug, Clone, Serialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum QuickReport {
    Today {
        report_type: String,
        date: String,
        total: u64,
        present: u64,
        absent: u64,
        late: u64,
        attendance_rate: f64,
    },
    StudentCount {
        report_type: String,
        date: String,
        total_students: u64,
        course_data: Vec<CourseCount>,
    },
    ClassAttendance {
        report_type: String,
        period: String,
        class_data: Vec<WeeklyClassAttendance>,
    },
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SavedReportListResponse {
    pub items: Vec<GeneratedReport>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct TemplateListResponse {
    pub items: Vec<ReportTemplate>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct WidgetListResponse {
    pub items: Vec<DashboardWidget>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ScheduleListResponse {
    pub items: Vec<ReportSchedule>,
}
