//! 首页组件：数据计算与管理

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use chrono::{Duration, NaiveDate};
use tracing::info;

use super::ReportService;
use super::chart::dataset;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::{RecordFilter, SessionListQuery},
    classes::requests::ClassListQuery,
    reports::{
        entities::{DashboardWidget, WidgetType},
        requests::{CreateWidgetRequest, UpdateWidgetRequest, validate_widget_layout},
        responses::{
            ActivityItem, ChartData, ClassStatsData, EmptyData, InstructorLoad,
            InstructorStatsData, RecentActivityData, TodayAttendance, WidgetData,
            WidgetListResponse,
        },
    },
    users::entities::{User, UserType},
};
use crate::services::{Reply, bad_request, current_user, forbidden, internal_error, not_found};
use crate::storage::Storage;
use crate::utils::clock::today;

/// 最近动作的时间窗口（天）和条数
const ACTIVITY_DAYS: i64 = 7;
const ACTIVITY_LIMIT: u64 = 5;

pub(super) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn rate1(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

pub(super) async fn today_attendance(storage: &Arc<dyn Storage>) -> crate::errors::Result<TodayAttendance> {
    let date = today();
    let counts = storage
        .count_records_by_status(RecordFilter {
            date_from: Some(date),
            date_to: Some(date),
            ..Default::default()
        })
        .await?;
    Ok(TodayAttendance {
        total: counts.total,
        present: counts.present,
        absent: counts.absent,
        late: counts.late,
    })
}

pub(super) async fn class_stats(storage: &Arc<dyn Storage>) -> crate::errors::Result<ClassStatsData> {
    let total = storage.count_classes(None).await?;
    let active = storage.count_classes(Some(true)).await?;
    let instructors = storage
        .count_users_by_type(UserType::Instructor, Some(true))
        .await?;
    let today = today_attendance(storage).await?;
    Ok(ClassStatsData {
        total,
        active,
        inactive: total.saturating_sub(active),
        instructors,
        today_attendance: rate1(today.present, today.total),
    })
}

fn daily_labels(start: NaiveDate, days: i64) -> Vec<NaiveDate> {
    (0..days).map(|i| start + Duration::days(i)).collect()
}

async fn attendance_chart(
    storage: &Arc<dyn Storage>,
    widget: &DashboardWidget,
) -> crate::errors::Result<ChartData> {
    let days = widget.config_i64("days", 7).clamp(1, 90);
    let start = today() - Duration::days(days - 1);

    let mut labels = Vec::with_capacity(days as usize);
    let mut rates = Vec::with_capacity(days as usize);
    for date in daily_labels(start, days) {
        let counts = storage
            .count_records_by_status(RecordFilter {
                date_from: Some(date),
                date_to: Some(date),
                ..Default::default()
            })
            .await?;
        labels.push(date.format("%d/%m").to_string());
        rates.push(rate1(counts.present, counts.total));
    }

    Ok(ChartData {
        chart_type: widget
            .chart_type
            .map(|c| c.to_string())
            .unwrap_or_else(|| "line".to_string()),
        labels,
        datasets: vec![dataset(
            "Attendance Rate %",
            rates,
            ("#28a745", "rgba(40, 167, 69, 0.1)"),
        )],
    })
}

async fn instructor_stats(storage: &Arc<dyn Storage>) -> crate::errors::Result<InstructorStatsData> {
    let total = storage.count_users_by_type(UserType::Instructor, None).await?;
    let active = storage
        .count_users_by_type(UserType::Instructor, Some(true))
        .await?;

    let mut top_instructors = Vec::new();
    for instructor in storage.list_instructors(true).await?.into_iter().take(10) {
        let classes = storage
            .list_classes(ClassListQuery {
                instructor_id: Some(instructor.id),
                is_active: Some(true),
                ..Default::default()
            })
            .await?;
        top_instructors.push(InstructorLoad {
            name: instructor.full_name(),
            classes: classes.len() as u64,
        });
    }
    top_instructors.sort_by(|a, b| b.classes.cmp(&a.classes));
    top_instructors.truncate(5);

    Ok(InstructorStatsData {
        total,
        active,
        inactive: total.saturating_sub(active),
        top_instructors,
    })
}

async fn recent_activity(storage: &Arc<dyn Storage>) -> crate::errors::Result<RecentActivityData> {
    let date = today();
    let sessions = storage
        .list_sessions(
            SessionListQuery {
                date_from: Some(date - Duration::days(ACTIVITY_DAYS)),
                date_to: Some(date),
                ..Default::default()
            },
            Some(ACTIVITY_LIMIT),
        )
        .await?;

    let class_ids: Vec<i64> = sessions.iter().map(|s| s.class_id).collect();
    let codes: HashMap<i64, String> = storage
        .list_classes_by_ids(&class_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c.class_code))
        .collect();

    let activities: Vec<ActivityItem> = sessions
        .iter()
        .map(|s| {
            let present = s.total_present.max(0) as u64;
            let total = (s.total_present + s.total_absent + s.total_late).max(0) as u64;
            ActivityItem {
                session_id: s.id,
                class: codes.get(&s.class_id).cloned().unwrap_or_default(),
                date: s.session_date.format("%d/%m").to_string(),
                time: s.start_time.format("%H:%M").to_string(),
                attendance: format!("{present}/{total}"),
                rate: rate1(present, total),
            }
        })
        .collect();

    Ok(RecentActivityData {
        count: activities.len() as u64,
        activities,
    })
}

pub(super) async fn widget_payload(
    storage: &Arc<dyn Storage>,
    widget: &DashboardWidget,
) -> crate::errors::Result<WidgetData> {
    Ok(match widget.widget_type {
        WidgetType::AttendanceChart => WidgetData::Chart(attendance_chart(storage, widget).await?),
        WidgetType::StudentStats => WidgetData::StudentStats(storage.student_stats().await?),
        WidgetType::ClassStats => WidgetData::ClassStats(class_stats(storage).await?),
        WidgetType::InstructorStats => {
            WidgetData::InstructorStats(instructor_stats(storage).await?)
        }
        WidgetType::RecentActivity => WidgetData::RecentActivity(recent_activity(storage).await?),
        WidgetType::Calendar | WidgetType::QuickLinks => WidgetData::Empty(EmptyData {}),
    })
}

fn can_view(widget: &DashboardWidget, user: &User) -> bool {
    user.is_admin() || (widget.is_active && widget.is_visible_to(&user.user_type))
}

async fn load_widget(storage: &Arc<dyn Storage>, widget_id: i64) -> Result<DashboardWidget, HttpResponse> {
    storage
        .get_widget(widget_id)
        .await
        .map_err(|e| internal_error("Failed to get widget", e))?
        .ok_or_else(|| not_found(ErrorCode::WidgetNotFound, "Widget not found"))
}

pub async fn widget_data(service: &ReportService, widget_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let widget = load_widget(&storage, widget_id).await?;
    if !can_view(&widget, &user) {
        return Err(forbidden(
            ErrorCode::WidgetAccessDenied,
            "You do not have access to this widget",
        ));
    }

    let data = widget_payload(&storage, &widget)
        .await
        .map_err(|e| internal_error("Failed to load widget data", e))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(data, "Widget data retrieved successfully")))
}

pub async fn list_widgets(service: &ReportService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let manage = user.user_type.is_management();
    let items = storage
        .list_widgets(!manage)
        .await
        .map_err(|e| internal_error("Failed to list widgets", e))?
        .into_iter()
        .filter(|w| manage || w.is_visible_to(&user.user_type))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        WidgetListResponse { items },
        "Widgets retrieved successfully",
    )))
}

pub async fn create_widget(
    service: &ReportService,
    req: CreateWidgetRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    req.validate()
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let storage = service.get_storage(request)?;
    let widget = storage
        .create_widget(req)
        .await
        .map_err(|e| internal_error("Failed to create widget", e))?;

    info!("用户 {} 创建首页组件 {}（{}）", user.username, widget.id, widget.widget_type);
    Ok(HttpResponse::Created().json(ApiResponse::success(widget, "Widget created successfully")))
}

pub async fn update_widget(
    service: &ReportService,
    widget_id: i64,
    update: UpdateWidgetRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let existing = load_widget(&storage, widget_id).await?;

    if let Some(name) = &update.name
        && name.trim().is_empty()
    {
        return Err(bad_request(ErrorCode::ValidationFailed, "Widget name is required"));
    }
    if update.width.is_some() || update.user_types.is_some() {
        let width = update.width.unwrap_or(existing.width);
        let user_types = update.user_types.as_ref().unwrap_or(&existing.user_types);
        validate_widget_layout(width, user_types)
            .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let widget = storage
        .update_widget(widget_id, update)
        .await
        .map_err(|e| internal_error("Failed to update widget", e))?
        .ok_or_else(|| not_found(ErrorCode::WidgetNotFound, "Widget not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(widget, "Widget updated successfully")))
}

pub async fn delete_widget(service: &ReportService, widget_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_widget(widget_id)
        .await
        .map_err(|e| internal_error("Failed to delete widget", e))?;
    if !deleted {
        return Err(not_found(ErrorCode::WidgetNotFound, "Widget not found"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Widget deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rounds_to_one_decimal() {
        assert_eq!(rate1(2, 3), 66.7);
        assert_eq!(rate1(1, 8), 12.5);
        assert_eq!(rate1(5, 0), 0.0);
    }

    #[test]
    fn test_daily_labels_are_contiguous() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        let days = daily_labels(start, 3);
        assert_eq!(days.len(), 3);
        assert_eq!(days[2], NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }
}
