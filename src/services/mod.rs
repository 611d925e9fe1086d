pub mod accounts;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod excuses;
pub mod reports;
pub mod students;
pub mod system;

mod scope;

pub use accounts::AccountService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use courses::CourseService;
pub use excuses::ExcuseService;
pub use reports::ReportService;
pub use students::StudentService;
pub use system::SystemService;

use std::fmt::Display;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use tracing::error;

use crate::cache::{ObjectCache, user_cache_key};
use crate::errors::AttendanceError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 业务处理结果，`Err` 为提前返回的错误响应
pub(crate) type Reply = Result<HttpResponse, HttpResponse>;

pub(crate) fn respond(reply: Reply) -> ActixResult<HttpResponse> {
    Ok(reply.unwrap_or_else(|response| response))
}

pub(crate) fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, code, message)
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::FORBIDDEN, code, message)
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, code, message)
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::CONFLICT, code, message)
}

/// 存储层错误统一记录日志后返回 500
pub(crate) fn internal_error(context: &str, err: impl Display) -> HttpResponse {
    error!("{context}: {err}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalServerError,
        format!("{context}: {err}"),
    )
}

/// 写入失败时区分唯一约束冲突
pub(crate) fn write_error(
    context: &str,
    err: AttendanceError,
    conflict_code: ErrorCode,
    conflict_message: &str,
) -> HttpResponse {
    if err.is_unique_violation() {
        conflict(conflict_code, conflict_message)
    } else {
        internal_error(context, err)
    }
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Authentication required",
        )
    })
}

pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|storage| storage.get_ref().clone())
        .ok_or_else(|| internal_error("Storage unavailable", "missing app data"))
}

/// 清除已登录用户的缓存，下次请求重新从数据库加载
pub(crate) async fn evict_cached_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

/// 定义带懒加载存储的服务结构体
macro_rules! lazy_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> Result<std::sync::Arc<dyn $crate::storage::Storage>, actix_web::HttpResponse> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::storage_from_request(request),
                }
            }
        }
    };
}

pub(crate) use lazy_service;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_maps_unique_violation_to_conflict() {
        let dup = AttendanceError::database_operation(
            "更新用户失败: UNIQUE constraint failed: users.email",
        );
        let resp = write_error(
            "User update failed",
            dup,
            ErrorCode::UserEmailAlreadyExists,
            "Email already registered",
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let other = AttendanceError::database_operation("更新用户失败: disk I/O error");
        let resp = write_error(
            "User update failed",
            other,
            ErrorCode::UserEmailAlreadyExists,
            "Email already registered",
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
