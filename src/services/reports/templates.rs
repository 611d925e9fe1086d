//! 报表模板管理

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ReportService;
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{
        requests::{CreateTemplateRequest, UpdateTemplateRequest},
        responses::TemplateListResponse,
    },
};
use crate::services::{Reply, bad_request, current_user, internal_error, not_found};

// 非管理层只能看到启用的模板
pub async fn list_templates(service: &ReportService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let items = storage
        .list_report_templates(!user.user_type.is_management())
        .await
        .map_err(|e| internal_error("Failed to list templates", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TemplateListResponse { items },
        "Templates retrieved successfully",
    )))
}

pub async fn get_template(service: &ReportService, template_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let template = storage
        .get_report_template(template_id)
        .await
        .map_err(|e| internal_error("Failed to get template", e))?
        .filter(|t| t.is_active || user.user_type.is_management())
        .ok_or_else(|| not_found(ErrorCode::TemplateNotFound, "Template not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(template, "Template retrieved successfully")))
}

pub async fn create_template(
    service: &ReportService,
    req: CreateTemplateRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    if req.name.trim().is_empty() {
        return Err(bad_request(ErrorCode::ValidationFailed, "Template name is required"));
    }

    let storage = service.get_storage(request)?;
    let template = storage
        .create_report_template(req, user.id)
        .await
        .map_err(|e| internal_error("Failed to create template", e))?;

    info!("用户 {} 创建报表模板 {}", user.username, template.name);
    Ok(HttpResponse::Created().json(ApiResponse::success(template, "Template created successfully")))
}

pub async fn update_template(
    service: &ReportService,
    template_id: i64,
    update: UpdateTemplateRequest,
    request: &HttpRequest,
) -> Reply {
    if let Some(name) = &update.name
        && name.trim().is_empty()
    {
        return Err(bad_request(ErrorCode::ValidationFailed, "Template name is required"));
    }

    let storage = service.get_storage(request)?;
    let template = storage
        .update_report_template(template_id, update)
        .await
        .map_err(|e| internal_error("Failed to update template", e))?
        .ok_or_else(|| not_found(ErrorCode::TemplateNotFound, "Template not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(template, "Template updated successfully")))
}

pub async fn delete_template(service: &ReportService, template_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_report_template(template_id)
        .await
        .map_err(|e| internal_error("Failed to delete template", e))?;
    if !deleted {
        return Err(not_found(ErrorCode::TemplateNotFound, "Template not found"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Template deleted successfully")))
}
