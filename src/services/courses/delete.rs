use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, internal_error, not_found};

/// 班级、选课记录随课程级联删除
pub async fn delete_course(service: &CourseService, course_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_course(course_id)
        .await
        .map_err(|e| internal_error("Course deletion failed", e))?;
    if !deleted {
        return Err(not_found(ErrorCode::CourseNotFound, "Course not found"));
    }

    info!("删除课程 {course_id}");
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Course deleted successfully")))
}
