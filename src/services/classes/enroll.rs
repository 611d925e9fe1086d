use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{
        requests::EnrollStudentsRequest,
        responses::{EnrollStudentsResponse, SkippedEnrollment},
    },
    students::{entities::EnrollmentType, requests::NewEnrollment},
};
use crate::services::{Reply, bad_request, internal_error, not_found};
use crate::utils::clock::today;

fn skip(student_id: i64, reason: &str) -> SkippedEnrollment {
    SkippedEnrollment {
        student_id,
        reason: reason.to_string(),
    }
}

/// 批量选课，逐个处理：不存在、已选、满员的学生跳过
pub async fn enroll_students(
    service: &ClassService,
    class_id: i64,
    req: EnrollStudentsRequest,
    request: &HttpRequest,
) -> Reply {
    if req.student_ids.is_empty() {
        return Err(bad_request(ErrorCode::ValidationFailed, "No students selected"));
    }

    let storage = service.get_storage(request)?;
    let class = storage
        .get_class_by_id(class_id)
        .await
        .map_err(|e| internal_error("Enrollment failed", e))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;

    let mut active = storage
        .count_active_enrollments(class.id)
        .await
        .map_err(|e| internal_error("Enrollment failed", e))?;
    let capacity = class.max_students.max(0) as u64;
    let enrollment_type = req.enrollment_type.unwrap_or(EnrollmentType::Regular);

    let mut enrolled = Vec::new();
    let mut skipped = Vec::new();

    // 去重并保持稳定顺序
    let student_ids: BTreeSet<i64> = req.student_ids.into_iter().collect();
    for student_id in student_ids {
        let student = storage
            .get_student_by_id(student_id)
            .await
            .map_err(|e| internal_error("Enrollment failed", e))?;
        if student.is_none() {
            skipped.push(skip(student_id, "Student not found"));
            continue;
        }

        let existing = storage
            .get_enrollment(student_id, class.id)
            .await
            .map_err(|e| internal_error("Enrollment failed", e))?;
        if existing.as_ref().is_some_and(|e| e.is_active) {
            skipped.push(skip(student_id, "Already enrolled"));
            continue;
        }
        if active >= capacity {
            skipped.push(skip(student_id, "Class is full"));
            continue;
        }

        match existing {
            Some(enrollment) => {
                storage
                    .set_enrollment_active(enrollment.id, true)
                    .await
                    .map_err(|e| internal_error("Enrollment failed", e))?;
            }
            None => {
                let result = storage
                    .create_enrollment(NewEnrollment {
                        student_id,
                        course_id: class.course_id,
                        class_id: class.id,
                        enrollment_date: today(),
                        enrollment_type: enrollment_type.clone(),
                        remarks: String::new(),
                    })
                    .await;
                match result {
                    Ok(_) => {}
                    Err(e) if e.is_unique_violation() => {
                        skipped.push(skip(student_id, "Already enrolled"));
                        continue;
                    }
                    Err(e) => return Err(internal_error("Enrollment failed", e)),
                }
            }
        }

        active += 1;
        enrolled.push(student_id);
    }

    info!(
        "班级 {} 批量选课：成功 {}，跳过 {}",
        class.class_code,
        enrolled.len(),
        skipped.len()
    );
    let message = format!("{} student(s) enrolled", enrolled.len());
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EnrollStudentsResponse { enrolled, skipped },
        message,
    )))
}
