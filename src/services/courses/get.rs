use actix_web::{HttpRequest, HttpResponse};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::responses::CourseDetailResponse};
use crate::services::{Reply, internal_error, not_found};

pub async fn get_course(service: &CourseService, course_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let course = storage
        .get_course_by_id(course_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve course", e))?
        .ok_or_else(|| not_found(ErrorCode::CourseNotFound, "Course not found"))?;

    let (class_count, active_class_count) = storage
        .count_classes_by_course(course_id)
        .await
        .map_err(|e| internal_error("Failed to count classes", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse {
            course,
            class_count,
            active_class_count,
        },
        "Course retrieved successfully",
    )))
}
