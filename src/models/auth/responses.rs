use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::models::attendance::entities::AttendanceSession;
use crate::models::users::entities::{User, UserType};

/// 登录成功：access token 放在响应体，refresh token 写入 HttpOnly cookie
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// 秒
    pub expires_in: i64,
    pub user: User,
    pub logged_in_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
    pub user_id: i64,
    pub user_type: UserType,
}

/// 登录后首页：按角色展示进行中的课次
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct DashboardResponse {
    pub user: User,
    pub active_sessions: Vec<AttendanceSession>,
    pub active_sessions_count: u64,
}
