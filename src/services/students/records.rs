use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::CreateAcademicRecordRequest, responses::AcademicRecordListResponse},
    users::entities::UserType,
};
use crate::services::{Reply, bad_request, current_user, forbidden, internal_error, not_found};

pub async fn add_academic_record(
    service: &StudentService,
    student_id: i64,
    req: CreateAcademicRecordRequest,
    request: &HttpRequest,
) -> Reply {
    req.validate()
        .map_err(|msg| bad_request(ErrorCode::AcademicRecordInvalid, msg))?;

    let storage = service.get_storage(request)?;
    if storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Failed to add academic record", e))?
        .is_none()
    {
        return Err(not_found(ErrorCode::StudentNotFound, "Student not found"));
    }

    let record = storage
        .create_academic_record(student_id, req)
        .await
        .map_err(|e| internal_error("Failed to add academic record", e))?;

    info!("学生 {} 新增成绩 {}", student_id, record.module_code);
    Ok(HttpResponse::Created().json(ApiResponse::success(record, "Academic record added successfully")))
}

/// 学生只能查看自己的成绩
pub async fn list_academic_records(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let student = storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve academic records", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    if user.user_type == UserType::Student && student.user_id != user.id {
        return Err(forbidden(
            ErrorCode::PermissionDenied,
            "You can only view your own academic records",
        ));
    }

    let items = storage
        .list_academic_records(student.id)
        .await
        .map_err(|e| internal_error("Failed to retrieve academic records", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AcademicRecordListResponse { items },
        "Academic records retrieved successfully",
    )))
}
