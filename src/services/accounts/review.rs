use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AccountService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::responses::UserInfoResponse,
    users::{entities::AccountStatusChange, requests::AccountReviewRequest},
};
use crate::services::{
    Reply, bad_request, current_user, evict_cached_user, forbidden, internal_error, not_found,
};

async fn apply_change(
    service: &AccountService,
    user_id: i64,
    change: AccountStatusChange,
    message: &str,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let user = storage
        .set_account_status(user_id, change)
        .await
        .map_err(|e| internal_error("Failed to update account status", e))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;

    // 状态变化后旧的缓存会让已拒绝账号继续通过认证
    evict_cached_user(request, user_id).await;
    info!("用户 {} 账号状态变更为 {}", user.username, user.account_status);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        message,
    )))
}

pub async fn approve_user(service: &AccountService, user_id: i64, request: &HttpRequest) -> Reply {
    let admin = current_user(request)?;
    let change = AccountStatusChange::approve(admin.id, chrono::Utc::now().timestamp());
    apply_change(service, user_id, change, "User has been approved", request).await
}

pub async fn reject_user(
    service: &AccountService,
    user_id: i64,
    review: AccountReviewRequest,
    request: &HttpRequest,
) -> Reply {
    let admin = current_user(request)?;
    if admin.id == user_id {
        return Err(forbidden(ErrorCode::CannotModifySelf, "You cannot reject your own account"));
    }
    let change = AccountStatusChange::reject(admin.id, &review.reason, chrono::Utc::now().timestamp())
        .map_err(|msg| bad_request(ErrorCode::RejectionReasonRequired, msg))?;
    apply_change(service, user_id, change, "User has been rejected", request).await
}

pub async fn suspend_user(
    service: &AccountService,
    user_id: i64,
    review: AccountReviewRequest,
    request: &HttpRequest,
) -> Reply {
    let admin = current_user(request)?;
    if admin.id == user_id {
        return Err(forbidden(ErrorCode::CannotModifySelf, "You cannot suspend your own account"));
    }
    let change = AccountStatusChange::suspend(admin.id, &review.reason, chrono::Utc::now().timestamp())
        .map_err(|msg| bad_request(ErrorCode::RejectionReasonRequired, msg))?;
    apply_change(service, user_id, change, "User has been suspended", request).await
}
