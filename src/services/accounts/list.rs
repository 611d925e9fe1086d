use actix_web::{HttpRequest, HttpResponse};

use super::AccountService;
use crate::models::{
    ApiResponse,
    users::{
        requests::{UserListParams, UserListQuery},
        responses::InstructorOption,
    },
};
use crate::services::{Reply, internal_error};

fn to_query(params: UserListParams, pending_staff_only: bool) -> UserListQuery {
    UserListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        user_type: params.user_type,
        account_status: params.account_status,
        search: params.search.filter(|s| !s.trim().is_empty()),
        pending_staff_only,
    }
}

pub async fn list_users(service: &AccountService, params: UserListParams, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let response = storage
        .list_users_with_pagination(to_query(params, false))
        .await
        .map_err(|e| internal_error("Failed to retrieve user list", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "User list retrieved successfully")))
}

/// 需要审核且仍处于待审核状态的账号
pub async fn list_pending_users(
    service: &AccountService,
    params: UserListParams,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let response = storage
        .list_users_with_pagination(to_query(params, true))
        .await
        .map_err(|e| internal_error("Failed to retrieve pending users", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Pending users retrieved successfully")))
}

/// 分配教师下拉框用
pub async fn list_instructors(service: &AccountService, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let instructors: Vec<InstructorOption> = storage
        .list_instructors(true)
        .await
        .map_err(|e| internal_error("Failed to retrieve instructors", e))?
        .into_iter()
        .map(InstructorOption::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(instructors, "Instructors retrieved successfully")))
}
