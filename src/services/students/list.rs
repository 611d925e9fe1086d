use actix_web::{HttpRequest, HttpResponse};

use super::StudentService;
use super::roster::build_class_roster;
use crate::middlewares::RequireClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    students::requests::{ClassRosterQuery, StudentListQuery, StudentQueryParams},
};
use crate::services::{Reply, internal_error, not_found};
use crate::utils::clock::today;

pub async fn list_students(
    service: &StudentService,
    query: StudentQueryParams,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let response = storage
        .list_students_with_pagination(StudentListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            search: query.search.filter(|s| !s.trim().is_empty()),
            status: query.status,
            course_id: query.course_id,
            class_id: query.class_id,
        })
        .await
        .map_err(|e| internal_error("Failed to retrieve student list", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Student list retrieved successfully")))
}

/// 班级花名册：本月出勤统计与班级概况
pub async fn students_by_class(
    service: &StudentService,
    query: ClassRosterQuery,
    request: &HttpRequest,
) -> Reply {
    let class = RequireClassAccess::extract_class(request)
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    let storage = service.get_storage(request)?;
    let response = build_class_roster(&storage, class, &query, today()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Students retrieved successfully")))
}
