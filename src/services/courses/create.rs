use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::requests::CreateCourseRequest};
use crate::services::{Reply, bad_request, conflict, internal_error, write_error};

pub async fn create_course(
    service: &CourseService,
    course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> Reply {
    course_data
        .validate()
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let storage = service.get_storage(request)?;
    if storage
        .get_course_by_code(course_data.code.trim())
        .await
        .map_err(|e| internal_error("Course creation failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::CourseAlreadyExists, "Course code already exists"));
    }

    let course = storage.create_course(course_data).await.map_err(|e| {
        write_error("Course creation failed", e, ErrorCode::CourseAlreadyExists, "Course code already exists")
    })?;

    info!("创建课程 {} ({})", course.code, course.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created successfully")))
}
