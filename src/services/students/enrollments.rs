use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::StudentService;
use super::get::enrollment_details;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{
        entities::EnrollmentType,
        requests::{EnrollStudentRequest, NewEnrollment},
    },
};
use crate::services::{Reply, bad_request, conflict, internal_error, not_found, write_error};
use crate::utils::clock::today;

/// 课程取自班级；已停用的选课重新启用
pub async fn enroll_student(
    service: &StudentService,
    student_id: i64,
    req: EnrollStudentRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let student = storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Enrollment failed", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;
    let class = storage
        .get_class_by_id(req.class_id)
        .await
        .map_err(|e| internal_error("Enrollment failed", e))?
        .ok_or_else(|| bad_request(ErrorCode::ClassNotFound, "Class does not exist"))?;

    let existing = storage
        .get_enrollment(student.id, class.id)
        .await
        .map_err(|e| internal_error("Enrollment failed", e))?;
    if existing.as_ref().is_some_and(|e| e.is_active) {
        return Err(conflict(
            ErrorCode::EnrollmentAlreadyExists,
            "Student is already enrolled in this class",
        ));
    }

    let active = storage
        .count_active_enrollments(class.id)
        .await
        .map_err(|e| internal_error("Enrollment failed", e))?;
    if active >= class.max_students.max(0) as u64 {
        return Err(bad_request(ErrorCode::ClassFull, "Class is full"));
    }

    let enrollment = match existing {
        Some(enrollment) => storage
            .set_enrollment_active(enrollment.id, true)
            .await
            .map_err(|e| internal_error("Enrollment failed", e))?
            .ok_or_else(|| not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"))?,
        None => storage
            .create_enrollment(NewEnrollment {
                student_id: student.id,
                course_id: class.course_id,
                class_id: class.id,
                enrollment_date: req.enrollment_date.unwrap_or_else(today),
                enrollment_type: req.enrollment_type.unwrap_or(EnrollmentType::Regular),
                remarks: req.remarks,
            })
            .await
            .map_err(|e| {
                write_error(
                    "Enrollment failed",
                    e,
                    ErrorCode::EnrollmentAlreadyExists,
                    "Student is already enrolled in this class",
                )
            })?,
    };

    info!("学生 {} 选课 {}", student.admission_number, class.class_code);
    Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "Student enrolled successfully")))
}

pub async fn list_enrollments(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    if storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve enrollments", e))?
        .is_none()
    {
        return Err(not_found(ErrorCode::StudentNotFound, "Student not found"));
    }

    let items = enrollment_details(&storage, student_id, false).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(items, "Enrollments retrieved successfully")))
}

pub async fn deactivate_enrollment(
    service: &StudentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let enrollment = storage
        .set_enrollment_active(enrollment_id, false)
        .await
        .map_err(|e| internal_error("Failed to deactivate enrollment", e))?
        .ok_or_else(|| not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"))?;

    info!("停用选课 {}", enrollment.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "Enrollment deactivated successfully")))
}
