use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::{UpdateClassRequest, validate_schedule},
};
use crate::services::{Reply, bad_request, conflict, internal_error, not_found, write_error};

pub async fn update_class(
    service: &ClassService,
    class_id: i64,
    update_data: UpdateClassRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let existing = storage
        .get_class_by_id(class_id)
        .await
        .map_err(|e| internal_error("Class update failed", e))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;

    // 与现有值合并后再校验日期、学期、容量
    validate_schedule(
        update_data.start_date.unwrap_or(existing.start_date),
        update_data.end_date.unwrap_or(existing.end_date),
        update_data.semester.unwrap_or(existing.semester),
        update_data.max_students.unwrap_or(existing.max_students),
    )
    .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    if let Some(ref name) = update_data.name
        && name.trim().is_empty()
    {
        return Err(bad_request(ErrorCode::ValidationFailed, "Class name is required"));
    }

    if let Some(course_id) = update_data.course_id
        && course_id != existing.course_id
        && storage
            .get_course_by_id(course_id)
            .await
            .map_err(|e| internal_error("Class update failed", e))?
            .is_none()
    {
        return Err(bad_request(ErrorCode::CourseNotFound, "Course does not exist"));
    }

    if let Some(ref code) = update_data.class_code {
        let code = code.trim();
        if code.is_empty() || code.len() > 20 {
            return Err(bad_request(
                ErrorCode::ValidationFailed,
                "Class code must be between 1 and 20 characters",
            ));
        }
        if let Some(other) = storage
            .get_class_by_code(code)
            .await
            .map_err(|e| internal_error("Class update failed", e))?
            && other.id != class_id
        {
            return Err(conflict(ErrorCode::ClassAlreadyExists, "Class code already exists"));
        }
    }

    let class = storage
        .update_class(class_id, update_data)
        .await
        .map_err(|e| {
            write_error("Class update failed", e, ErrorCode::ClassAlreadyExists, "Class code already exists")
        })?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;

    info!("更新班级 {} ({})", class.class_code, class.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated successfully")))
}
