use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::RecordFilter,
    students::responses::{
        EnrollmentDetail, StudentAttendanceStats, StudentDashboardResponse, StudentDetailResponse,
    },
};
use crate::services::attendance::rules::attendance_rate;
use crate::services::{Reply, current_user, internal_error, not_found};
use crate::storage::Storage;

/// 选课记录附带班级信息
pub(crate) async fn enrollment_details(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    active_only: bool,
) -> Result<Vec<EnrollmentDetail>, HttpResponse> {
    let enrollments = storage
        .list_enrollments_by_student(student_id, active_only)
        .await
        .map_err(|e| internal_error("Failed to retrieve enrollments", e))?;
    let class_ids: Vec<i64> = enrollments.iter().map(|e| e.class_id).collect();
    let classes: HashMap<i64, _> = storage
        .list_classes_by_ids(&class_ids)
        .await
        .map_err(|e| internal_error("Failed to retrieve classes", e))?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(enrollments
        .into_iter()
        .map(|enrollment| EnrollmentDetail {
            class: classes.get(&enrollment.class_id).cloned(),
            enrollment,
        })
        .collect())
}

pub async fn get_student(service: &StudentService, student_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let student = storage
        .get_student_by_id(student_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve student", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;
    let user = storage
        .get_user_by_id(student.user_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve student", e))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "Student account not found"))?;
    let enrollments = enrollment_details(&storage, student.id, false).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentDetailResponse {
            student,
            user,
            enrollments,
        },
        "Student retrieved successfully",
    )))
}

/// 学生本人：档案、有效选课、全部考勤记录上的出勤率
pub async fn student_dashboard(service: &StudentService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let student = storage
        .get_student_by_user_id(user.id)
        .await
        .map_err(|e| internal_error("Failed to load student profile", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentProfileMissing, "Student profile not found"))?;

    let enrollments = enrollment_details(&storage, student.id, true).await?;
    let counts = storage
        .count_records_by_status(RecordFilter {
            student_id: Some(student.id),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to count attendance", e))?;

    let stats = StudentAttendanceStats {
        total_sessions: counts.total,
        present: counts.present,
        late: counts.late,
        absent: counts.absent,
        excused: counts.excused,
        half_day: counts.half_day,
        attendance_rate: attendance_rate(counts.present, counts.total),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentDashboardResponse {
            student,
            user,
            enrollments,
            stats,
        },
        "Dashboard retrieved successfully",
    )))
}
