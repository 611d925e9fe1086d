use actix_web::{HttpRequest, HttpResponse};

use super::AuthService;
use crate::models::{
    ApiResponse,
    attendance::{entities::SessionStatus, requests::SessionListQuery},
    auth::DashboardResponse,
};
use crate::services::scope::{Scope, resolve_scope};
use crate::services::{Reply, current_user, internal_error};

const DASHBOARD_SESSION_LIMIT: u64 = 5;

/// 首页展示进行中的课次：教师看自己的，学生看所在班级的，其他角色看全部
pub async fn handle_dashboard(service: &AuthService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let scope = resolve_scope(&storage, &user).await?;

    let query = SessionListQuery {
        status: Some(SessionStatus::Ongoing),
        instructor_id: scope.instructor_id(),
        class_ids: scope.class_ids(),
        ..Default::default()
    };

    let (active_sessions, active_sessions_count) = match scope {
        Scope::Student { ref class_ids, .. } if class_ids.is_empty() => (Vec::new(), 0),
        _ => {
            let sessions = storage
                .list_sessions(query.clone(), Some(DASHBOARD_SESSION_LIMIT))
                .await
                .map_err(|e| internal_error("Failed to load dashboard", e))?;
            let count = storage
                .count_sessions(query)
                .await
                .map_err(|e| internal_error("Failed to load dashboard", e))?;
            (sessions, count)
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DashboardResponse {
            user,
            active_sessions,
            active_sessions_count,
        },
        "Dashboard loaded",
    )))
}
