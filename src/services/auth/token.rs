use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::AuthService;
use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, current_user, internal_error};
use crate::utils::jwt::{JwtUtils, TOKEN_TYPE};

fn session_expired() -> HttpResponse {
    HttpResponse::build(StatusCode::UNAUTHORIZED)
        .cookie(JwtUtils::expired_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

/// 用 cookie 中的 refresh token 换新的 access token
///
/// 重新加载用户，已被拒绝或停用的账号不能续期。
pub async fn handle_refresh_token(service: &AuthService, request: &HttpRequest) -> Reply {
    let refresh_token = JwtUtils::refresh_token_from_request(request).ok_or_else(session_expired)?;
    let claims = JwtUtils::verify_refresh_token(&refresh_token).map_err(|e| {
        info!("refresh token 无效: {e}");
        session_expired()
    })?;
    let user_id = claims.user_id().ok_or_else(session_expired)?;

    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| internal_error("Failed to refresh token", e))?
        .filter(|user| user.login_block_reason().is_none())
        .ok_or_else(session_expired)?;

    let access_token = JwtUtils::generate_access_token(user.id, &user.user_type.to_string())
        .map_err(|e| internal_error("Failed to refresh token", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: JwtUtils::access_token_ttl_secs(),
        },
        "Token refreshed successfully",
    )))
}

/// 能走到这里说明 RequireJWT 已经通过
pub fn handle_verify_token(request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse {
            is_valid: true,
            user_id: user.id,
            user_type: user.user_type,
        },
        "Token is valid",
    )))
}

pub fn handle_me(request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved successfully",
    )))
}
