use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ExcuseService;
use crate::models::{
    ApiResponse, ErrorCode,
    excuses::{
        entities::ExcuseStatus,
        requests::{ReviewAction, ReviewExcuseRequest},
    },
};
use crate::services::{Reply, bad_request, current_user, forbidden, internal_error, not_found};

/// 任课教师或管理员审核；批准后标记日期范围内的考勤记录为请假
pub async fn review_excuse(
    service: &ExcuseService,
    excuse_id: i64,
    req: ReviewExcuseRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let excuse = storage
        .get_excuse_by_id(excuse_id)
        .await
        .map_err(|e| internal_error("Failed to review excuse", e))?
        .ok_or_else(|| not_found(ErrorCode::ExcuseNotFound, "Excuse application not found"))?;

    let teaches = storage
        .get_class_by_id(excuse.class_id)
        .await
        .map_err(|e| internal_error("Failed to review excuse", e))?
        .is_some_and(|c| c.is_taught_by(user.id));
    if !teaches && !user.is_admin() {
        return Err(forbidden(
            ErrorCode::ExcusePermissionDenied,
            "You do not have permission to review this excuse application",
        ));
    }

    if !excuse.is_pending() {
        return Err(bad_request(
            ErrorCode::ExcuseAlreadyReviewed,
            "This application has already been reviewed",
        ));
    }

    let status = match req.action {
        ReviewAction::Approve => ExcuseStatus::Approved,
        ReviewAction::Reject => ExcuseStatus::Rejected,
    };
    let reviewed = storage
        .review_excuse(excuse.id, status, user.id, req.review_notes.trim().to_string())
        .await
        .map_err(|e| internal_error("Failed to review excuse", e))?
        .ok_or_else(|| {
            bad_request(
                ErrorCode::ExcuseAlreadyReviewed,
                "This application has already been reviewed",
            )
        })?;

    info!(
        "用户 {} 审核请假 {}：{}，更新 {} 条记录",
        user.username, reviewed.application.id, reviewed.application.status, reviewed.records_excused
    );
    let message = format!("Excuse application {}", reviewed.application.status);
    Ok(HttpResponse::Ok().json(ApiResponse::success(reviewed, message)))
}

/// 学生撤回自己待审核的申请
pub async fn cancel_excuse(service: &ExcuseService, excuse_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let excuse = storage
        .get_excuse_by_id(excuse_id)
        .await
        .map_err(|e| internal_error("Failed to cancel excuse", e))?
        .ok_or_else(|| not_found(ErrorCode::ExcuseNotFound, "Excuse application not found"))?;

    let owns = storage
        .get_student_by_user_id(user.id)
        .await
        .map_err(|e| internal_error("Failed to cancel excuse", e))?
        .is_some_and(|s| s.id == excuse.student_id);
    if !owns {
        return Err(forbidden(
            ErrorCode::ExcusePermissionDenied,
            "You can only cancel your own applications",
        ));
    }
    if !excuse.is_pending() {
        return Err(bad_request(
            ErrorCode::ExcuseAlreadyReviewed,
            "Only pending applications can be cancelled",
        ));
    }

    let excuse = storage
        .cancel_excuse(excuse.id)
        .await
        .map_err(|e| internal_error("Failed to cancel excuse", e))?
        .ok_or_else(|| {
            bad_request(
                ErrorCode::ExcuseAlreadyReviewed,
                "Only pending applications can be cancelled",
            )
        })?;

    info!("请假申请 {} 已撤回", excuse.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(excuse, "Excuse application cancelled")))
}
