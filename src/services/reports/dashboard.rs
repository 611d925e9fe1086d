use actix_web::{HttpRequest, HttpResponse};

use super::ReportService;
use super::widgets::{class_stats, today_attendance};
use crate::models::{ApiResponse, reports::responses::ReportsDashboardResponse};
use crate::services::{Reply, current_user, internal_error};
use crate::utils::clock::today;

const RECENT_REPORTS: u64 = 5;

/// 报表首页：当前用户可见的组件、最近报表和今日概况
pub async fn reports_dashboard(service: &ReportService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let failed = |e| internal_error("Failed to load reports dashboard", e);

    let mut widgets: Vec<_> = storage
        .list_widgets(true)
        .await
        .map_err(failed)?
        .into_iter()
        .filter(|w| w.is_visible_to(&user.user_type))
        .collect();
    widgets.sort_by_key(|w| w.display_order);

    let recent_reports = storage
        .list_recent_reports(user.id, RECENT_REPORTS)
        .await
        .map_err(failed)?;
    let today_attendance = today_attendance(&storage).await.map_err(failed)?;
    let student_stats = storage.student_stats().await.map_err(failed)?;
    let class_stats = class_stats(&storage).await.map_err(failed)?;

    let response = ReportsDashboardResponse {
        widgets,
        recent_reports,
        today_attendance,
        student_stats,
        class_stats,
        today: today(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Dashboard loaded successfully")))
}
