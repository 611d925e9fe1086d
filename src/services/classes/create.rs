use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ClassService;
use super::instructor::ensure_instructor;
use crate::models::{ApiResponse, ErrorCode, classes::requests::CreateClassRequest};
use crate::services::{Reply, bad_request, conflict, internal_error, write_error};

pub async fn create_class(
    service: &ClassService,
    class_data: CreateClassRequest,
    request: &HttpRequest,
) -> Reply {
    class_data
        .validate()
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let storage = service.get_storage(request)?;

    if storage
        .get_course_by_id(class_data.course_id)
        .await
        .map_err(|e| internal_error("Class creation failed", e))?
        .is_none()
    {
        return Err(bad_request(ErrorCode::CourseNotFound, "Course does not exist"));
    }

    if let Some(instructor_id) = class_data.instructor_id {
        ensure_instructor(&storage, instructor_id).await?;
    }

    if storage
        .get_class_by_code(class_data.class_code.trim())
        .await
        .map_err(|e| internal_error("Class creation failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::ClassAlreadyExists, "Class code already exists"));
    }

    let class = storage.create_class(class_data).await.map_err(|e| {
        write_error("Class creation failed", e, ErrorCode::ClassAlreadyExists, "Class code already exists")
    })?;

    info!("创建班级 {} ({})", class.class_code, class.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}
