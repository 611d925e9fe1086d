use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::requests::{UpdateStudentRequest, validate_year_of_admission},
    users::requests::UpdateUserRequest,
};
use crate::services::{
    Reply, bad_request, conflict, evict_cached_user, internal_error, not_found, write_error,
};
use crate::utils::validate::{validate_email, validate_phone_number};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    mut update_data: UpdateStudentRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let student = storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Student update failed", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    if let Some(year) = update_data.year_of_admission {
        validate_year_of_admission(year).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    // 姓名、邮箱、电话属于登录账号
    let email = update_data.email.take().map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        validate_email(email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
        if let Some(other) = storage
            .get_user_by_email(email)
            .await
            .map_err(|e| internal_error("Student update failed", e))?
            && other.id != student.user_id
        {
            return Err(conflict(ErrorCode::UserEmailAlreadyExists, "Email already registered"));
        }
    }
    let phone_number = update_data.phone_number.take();
    if let Some(phone) = phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_phone_number(phone).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let user_update = UpdateUserRequest {
        email,
        first_name: update_data.first_name.take().map(|n| n.trim().to_string()),
        last_name: update_data.last_name.take().map(|n| n.trim().to_string()),
        phone_number,
        ..Default::default()
    };
    if user_update.email.is_some()
        || user_update.first_name.is_some()
        || user_update.last_name.is_some()
        || user_update.phone_number.is_some()
    {
        storage
            .update_user(student.user_id, user_update)
            .await
            .map_err(|e| {
                write_error("Student update failed", e, ErrorCode::UserEmailAlreadyExists, "Email already registered")
            })?;
        evict_cached_user(request, student.user_id).await;
    }

    let student = storage
        .update_student(student_id, update_data)
        .await
        .map_err(|e| internal_error("Student update failed", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    info!("更新学生 {}", student.admission_number);
    Ok(HttpResponse::Ok().json(ApiResponse::success(student, "Student updated successfully")))
}

pub async fn toggle_student_status(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let student = storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Failed to update student status", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    let status = student.status.toggled();
    let student = storage
        .set_student_status(student_id, status)
        .await
        .map_err(|e| internal_error("Failed to update student status", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    info!("学生 {} 状态切换为 {}", student.admission_number, student.status);
    let message = format!("Student status changed to {}", student.status);
    Ok(HttpResponse::Ok().json(ApiResponse::success(student, message)))
}
