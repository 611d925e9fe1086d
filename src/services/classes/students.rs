use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use super::ClassService;
use crate::middlewares::RequireClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::SessionStatus,
        requests::{RecordFilter, SessionListQuery},
    },
    classes::{
        entities::Class,
        responses::{ClassStudentItem, ClassStudentsResponse},
    },
    students::responses::StudentAttendanceStats,
};
use crate::services::attendance::rules::weighted_rate;
use crate::services::{Reply, internal_error, not_found};
use crate::storage::Storage;

/// 班级有效选课学生及其在已结束课次上的出勤统计
async fn build_class_students(
    storage: &Arc<dyn Storage>,
    class: Class,
) -> Result<ClassStudentsResponse, HttpResponse> {
    let enrollments = storage
        .list_enrollments_by_class(class.id, true)
        .await
        .map_err(|e| internal_error("Failed to load enrollments", e))?;

    let total_sessions = storage
        .count_sessions(SessionListQuery {
            class_id: Some(class.id),
            status: Some(SessionStatus::Completed),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to count sessions", e))?;

    let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
    let students: HashMap<i64, _> = storage
        .list_students_by_ids(&student_ids)
        .await
        .map_err(|e| internal_error("Failed to load students", e))?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let user_ids: Vec<i64> = students.values().map(|s| s.user_id).collect();
    let names: HashMap<i64, String> = storage
        .list_users_by_ids(&user_ids)
        .await
        .map_err(|e| internal_error("Failed to load users", e))?
        .into_iter()
        .map(|u| (u.id, u.full_name()))
        .collect();

    let mut items = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let Some(student) = students.get(&enrollment.student_id) else {
            continue;
        };
        let counts = storage
            .count_records_by_status(RecordFilter {
                class_id: Some(class.id),
                student_id: Some(student.id),
                session_status: Some(SessionStatus::Completed),
                ..Default::default()
            })
            .await
            .map_err(|e| internal_error("Failed to count attendance", e))?;

        items.push(ClassStudentItem {
            student_id: student.id,
            admission_number: student.admission_number.clone(),
            student_name: names.get(&student.user_id).cloned().unwrap_or_default(),
            stats: StudentAttendanceStats {
                total_sessions,
                present: counts.present,
                late: counts.late,
                absent: counts.absent,
                excused: counts.excused,
                half_day: counts.half_day,
                attendance_rate: weighted_rate(counts.present, counts.half_day, total_sessions),
            },
            enrollment,
        });
    }
    items.sort_by(|a, b| a.admission_number.cmp(&b.admission_number));

    Ok(ClassStudentsResponse {
        class,
        total_sessions,
        items,
    })
}

pub async fn class_students(service: &ClassService, request: &HttpRequest) -> Reply {
    let class = RequireClassAccess::extract_class(request)
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    let storage = service.get_storage(request)?;
    let response = build_class_students(&storage, class).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Class students retrieved successfully")))
}
