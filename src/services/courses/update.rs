use actix_web::{HttpRequest, HttpResponse};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::requests::UpdateCourseRequest};
use crate::services::{Reply, bad_request, conflict, internal_error, not_found, write_error};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    update_data: UpdateCourseRequest,
    request: &HttpRequest,
) -> Reply {
    update_data
        .validate()
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let storage = service.get_storage(request)?;
    if let Some(code) = &update_data.code {
        let taken = storage
            .get_course_by_code(code.trim())
            .await
            .map_err(|e| internal_error("Course update failed", e))?
            .is_some_and(|other| other.id != course_id);
        if taken {
            return Err(conflict(ErrorCode::CourseAlreadyExists, "Course code already exists"));
        }
    }

    let course = storage
        .update_course(course_id, update_data)
        .await
        .map_err(|e| {
            write_error("Course update failed", e, ErrorCode::CourseAlreadyExists, "Course code already exists")
        })?
        .ok_or_else(|| not_found(ErrorCode::CourseNotFound, "Course not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully")))
}
