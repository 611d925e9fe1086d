use actix_web::{HttpRequest, HttpResponse};

use super::CourseService;
use crate::models::{
    ApiResponse,
    courses::requests::{CourseListQuery, CourseQueryParams},
};
use crate::services::{Reply, internal_error};

pub async fn list_courses(
    service: &CourseService,
    query: CourseQueryParams,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search.filter(|s| !s.trim().is_empty()),
        level: query.level,
        department: query.department.filter(|d| !d.trim().is_empty()),
        is_active: query.is_active,
    };

    let response = storage
        .list_courses_with_pagination(list_query)
        .await
        .map_err(|e| internal_error("Failed to retrieve course list", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Course list retrieved successfully")))
}

pub async fn list_active_courses(service: &CourseService, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let courses = storage
        .list_active_courses()
        .await
        .map_err(|e| internal_error("Failed to retrieve courses", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(courses, "Courses retrieved successfully")))
}
