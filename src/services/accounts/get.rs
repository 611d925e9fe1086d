use actix_web::{HttpRequest, HttpResponse};

use super::AccountService;
use crate::models::{ApiResponse, ErrorCode, auth::responses::UserInfoResponse};
use crate::services::{Reply, internal_error, not_found};

pub async fn get_user(service: &AccountService, user_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve user", e))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfoResponse { user }, "User retrieved successfully")))
}
