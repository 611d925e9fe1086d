//! 已保存报表

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ReportService;
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{
        entities::GeneratedReport,
        requests::{SaveReportRequest, SavedReportListQuery, SavedReportQueryParams},
    },
    users::entities::User,
};
use crate::services::{Reply, bad_request, current_user, forbidden, internal_error, not_found};
use crate::storage::Storage;

/// 报表只对生成者本人和管理员开放
fn can_access(report: &GeneratedReport, user: &User) -> bool {
    report.generated_by == Some(user.id) || user.is_admin()
}

async fn load_report(storage: &Arc<dyn Storage>, report_id: i64) -> Result<GeneratedReport, HttpResponse> {
    storage
        .get_generated_report(report_id)
        .await
        .map_err(|e| internal_error("Failed to get report", e))?
        .ok_or_else(|| not_found(ErrorCode::ReportNotFound, "Report not found"))
}

fn denied() -> HttpResponse {
    forbidden(
        ErrorCode::ReportPermissionDenied,
        "You do not have permission to access this report",
    )
}

pub async fn save_report(service: &ReportService, req: SaveReportRequest, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    if req.report_name.trim().is_empty() {
        return Err(bad_request(ErrorCode::ValidationFailed, "Report name is required"));
    }
    if let (Some(start), Some(end)) = (req.start_date, req.end_date)
        && start > end
    {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            "Start date must not be after end date",
        ));
    }

    let storage = service.get_storage(request)?;
    let report = storage
        .save_generated_report(req, user.id)
        .await
        .map_err(|e| internal_error("Failed to save report", e))?;

    info!("用户 {} 保存报表 {}（{}）", user.username, report.id, report.report_type);
    Ok(HttpResponse::Created().json(ApiResponse::success(report, "Report saved successfully")))
}

pub async fn list_saved_reports(
    service: &ReportService,
    params: SavedReportQueryParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let response = storage
        .list_generated_reports(SavedReportListQuery {
            page: params.page,
            size: params.size,
            generated_by: (!user.is_admin()).then_some(user.id),
            include_archived: params.include_archived.unwrap_or(false),
        })
        .await
        .map_err(|e| internal_error("Failed to list reports", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Reports retrieved successfully")))
}

pub async fn get_saved_report(service: &ReportService, report_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let report = load_report(&storage, report_id).await?;
    if !can_access(&report, &user) {
        return Err(denied());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "Report retrieved successfully")))
}

pub async fn archive_report(service: &ReportService, report_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let report = load_report(&storage, report_id).await?;
    if !can_access(&report, &user) {
        return Err(denied());
    }

    let report = storage
        .archive_generated_report(report_id)
        .await
        .map_err(|e| internal_error("Failed to archive report", e))?
        .ok_or_else(|| not_found(ErrorCode::ReportNotFound, "Report not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "Report archived successfully")))
}

pub async fn delete_report(service: &ReportService, report_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let report = load_report(&storage, report_id).await?;
    if !can_access(&report, &user) {
        return Err(denied());
    }

    storage
        .delete_generated_report(report_id)
        .await
        .map_err(|e| internal_error("Failed to delete report", e))?;

    info!("用户 {} 删除报表 {}", user.username, report_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Report deleted successfully")))
}
