use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{error, info, warn};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::AccountStatus,
};
use crate::services::{Reply, error_response, internal_error};
use crate::utils::jwt::{JwtUtils, TOKEN_TYPE};
use crate::utils::password::verify_password;

const BAD_CREDENTIALS: &str = "Invalid username or password";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let config = service.get_config();
    let identifier = login_request.username.trim();

    let user = storage
        .get_user_by_username_or_email(identifier)
        .await
        .map_err(|e| internal_error("Login failed", e))?
        .filter(|user| verify_password(&login_request.password, &user.password_hash))
        .ok_or_else(|| {
            info!("登录失败: {identifier}");
            error_response(StatusCode::UNAUTHORIZED, ErrorCode::AuthFailed, BAD_CREDENTIALS)
        })?;

    // 密码正确但账号未通过审核或已停用
    if let Some(reason) = user.login_block_reason() {
        let code = match user.account_status {
            AccountStatus::Approved => ErrorCode::AccountInactive,
            _ => ErrorCode::AccountNotApproved,
        };
        return Err(error_response(StatusCode::UNAUTHORIZED, code, reason));
    }

    let token_pair = user.generate_token_pair(login_request.remember_me).map_err(|e| {
        error!("签发令牌失败: {e}");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Login failed, unable to generate token",
        )
    })?;

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("更新 {} 最后登录时间失败: {e}", user.id);
    }

    info!("用户 {} 登录成功", user.username);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: config.jwt.access_token_expiry * 60,
        user,
        logged_in_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::refresh_token_cookie(
            &token_pair.refresh_token,
            token_pair.refresh_expiry,
        ))
        .json(ApiResponse::success(response, "Login successful")))
}

/// 覆盖 refresh token cookie，access token 由客户端丢弃
pub fn handle_logout() -> Reply {
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::expired_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("You have been logged out")))
}
