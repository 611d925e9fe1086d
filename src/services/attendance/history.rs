use actix_web::{HttpRequest, HttpResponse};

use super::AttendanceService;
use super::rules::attendance_rate;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        requests::{HistoryQueryParams, RecordFilter, SessionListQuery},
        responses::StudentHistoryResponse,
    },
    users::entities::UserType,
};
use crate::services::{Reply, current_user, forbidden, internal_error, not_found};

const HISTORY_PAGE_SIZE: i64 = 20;

/// 学生考勤历史；出勤率以学生当前班级的课次数为分母
pub async fn student_history(
    service: &AttendanceService,
    query: HistoryQueryParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let student = if user.user_type == UserType::Student {
        let own = storage
            .get_student_by_user_id(user.id)
            .await
            .map_err(|e| internal_error("Failed to retrieve attendance history", e))?
            .ok_or_else(|| not_found(ErrorCode::StudentProfileMissing, "Student profile not found"))?;
        if query.student_id.is_some_and(|id| id != own.id) {
            return Err(forbidden(
                ErrorCode::PermissionDenied,
                "You can only view your own attendance history",
            ));
        }
        own
    } else {
        let student_id = query
            .student_id
            .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not specified"))?;
        storage
            .get_student_by_id(student_id)
            .await
            .map_err(|e| internal_error("Failed to retrieve attendance history", e))?
            .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?
    };

    let filter = RecordFilter {
        student_id: Some(student.id),
        ..Default::default()
    };
    let page = query.page.unwrap_or(1).max(1);
    let size = query.size.unwrap_or(HISTORY_PAGE_SIZE).clamp(1, 100);
    let (items, pagination) = storage
        .list_record_details_page(filter.clone(), page, size)
        .await
        .map_err(|e| internal_error("Failed to retrieve attendance history", e))?;
    let counts = storage
        .count_records_by_status(filter)
        .await
        .map_err(|e| internal_error("Failed to count attendance", e))?;

    let total_sessions = match student.current_class_id {
        Some(class_id) => storage
            .count_sessions(SessionListQuery {
                class_id: Some(class_id),
                ..Default::default()
            })
            .await
            .map_err(|e| internal_error("Failed to count sessions", e))?,
        None => 0,
    };

    let response = StudentHistoryResponse {
        attendance_rate: attendance_rate(counts.present, total_sessions),
        student,
        items,
        pagination,
        total_sessions,
        present: counts.present,
        absent: counts.absent,
        late: counts.late,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Attendance history retrieved successfully")))
}
