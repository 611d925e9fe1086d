use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AccountService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, evict_cached_user, forbidden, internal_error, not_found};

pub async fn delete_user(service: &AccountService, user_id: i64, request: &HttpRequest) -> Reply {
    let admin = current_user(request)?;
    if admin.id == user_id {
        return Err(forbidden(ErrorCode::CannotModifySelf, "You cannot delete your own account"));
    }

    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_user(user_id)
        .await
        .map_err(|e| internal_error("User deletion failed", e))?;
    if !deleted {
        return Err(not_found(ErrorCode::UserNotFound, "User not found"));
    }

    evict_cached_user(request, user_id).await;
    info!("管理员 {} 删除了用户 {}", admin.id, user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("User deleted successfully")))
}
