use actix_web::{HttpRequest, HttpResponse};

use super::ClassService;
use crate::middlewares::RequireClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::responses::ClassDetailResponse,
    users::responses::InstructorOption,
};
use crate::services::{Reply, internal_error, not_found};

/// 班级已由 RequireClassAccess 中间件加载并校验权限
pub async fn get_class(service: &ClassService, request: &HttpRequest) -> Reply {
    let class = RequireClassAccess::extract_class(request)
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    let storage = service.get_storage(request)?;

    let course = storage
        .get_course_by_id(class.course_id)
        .await
        .map_err(|e| internal_error("Failed to load course", e))?;

    let instructor = match class.instructor_id {
        Some(id) => storage
            .get_user_by_id(id)
            .await
            .map_err(|e| internal_error("Failed to load instructor", e))?
            .map(InstructorOption::from),
        None => None,
    };

    let enrolled_count = storage
        .count_active_enrollments(class.id)
        .await
        .map_err(|e| internal_error("Failed to count enrollments", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDetailResponse {
            class,
            course,
            instructor,
            enrolled_count,
        },
        "Class retrieved successfully",
    )))
}
