use super::entities::{AccountStatus, UserType};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub user_type: Option<UserType>,
    pub account_status: Option<AccountStatus>,
    pub search: Option<String>,
}

// 管理员创建用户请求
//
// 管理员创建的账号默认直接通过审核，可显式指定 account_status
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub account_status: Option<AccountStatus>,
}

// 用户更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_type: Option<UserType>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

// 拒绝/停用账号请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct AccountReviewRequest {
    #[serde(default)]
    pub reason: String,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub user_type: Option<UserType>,
    pub account_status: Option<AccountStatus>,
    pub search: Option<String>,
    /// 只列出等待审核的教职工账号
    pub pending_staff_only: bool,
}

// 新用户写入参数（用于存储层，密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub account_status: AccountStatus,
    pub is_active: bool,
    pub approved_by: Option<i64>,
}
