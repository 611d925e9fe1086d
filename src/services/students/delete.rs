use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, evict_cached_user, internal_error, not_found};

/// 删除登录账号，学籍档案、选课、考勤记录随之级联删除
pub async fn delete_student(service: &StudentService, student_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let student = storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Student deletion failed", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    storage
        .delete_user(student.user_id)
        .await
        .map_err(|e| internal_error("Student deletion failed", e))?;
    evict_cached_user(request, student.user_id).await;

    info!("删除学生 {}", student.admission_number);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Student deleted successfully")))
}
