use super::entities::User;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

// 教师下拉列表项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct InstructorOption {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
}

impl From<User> for InstructorOption {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.full_name(),
            email: user.email,
            department: user.department,
        }
    }
}
