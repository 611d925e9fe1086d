use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AttendanceService;
use super::rules;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        requests::{
            GenerateSummaryRequest, RecordFilter, SessionListQuery, SummaryQueryParams, SummaryWrite,
        },
        responses::SummaryListResponse,
    },
    users::entities::UserType,
};
use crate::services::{Reply, bad_request, current_user, forbidden, internal_error, not_found};

/// 生成（或重新生成）学生在某班级的周期汇总
pub async fn generate_summary(
    service: &AttendanceService,
    req: GenerateSummaryRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;

    let student = storage
        .get_student_by_id(req.student_id)
        .await
        .map_err(|e| internal_error("Failed to generate summary", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;
    let class = storage
        .get_class_by_id(req.class_id)
        .await
        .map_err(|e| internal_error("Failed to generate summary", e))?
        .ok_or_else(|| bad_request(ErrorCode::ClassNotFound, "Class does not exist"))?;

    let (period_start, period_end) = rules::period_bounds(req.period_type, req.period_start)
        .ok_or_else(|| bad_request(ErrorCode::ValidationFailed, "Period start is out of range"))?;

    let counts = storage
        .count_records_by_status(RecordFilter {
            student_id: Some(student.id),
            class_id: Some(class.id),
            date_from: Some(period_start),
            date_to: Some(period_end),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to generate summary", e))?;
    let total_sessions = storage
        .count_sessions(SessionListQuery {
            class_id: Some(class.id),
            date_from: Some(period_start),
            date_to: Some(period_end),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to generate summary", e))?;

    let previous_period_rate = match rules::previous_period_start(req.period_type, period_start) {
        Some(previous_start) => storage
            .get_summary(student.id, class.id, req.period_type, previous_start)
            .await
            .map_err(|e| internal_error("Failed to generate summary", e))?
            .map(|s| s.attendance_rate),
        None => None,
    };

    let attendance_rate = rules::attendance_rate(counts.present, total_sessions);
    let summary = storage
        .save_summary(SummaryWrite {
            student_id: student.id,
            class_id: class.id,
            period_type: req.period_type,
            period_start,
            period_end,
            total_sessions: total_sessions as i32,
            present_count: counts.present as i32,
            absent_count: counts.absent as i32,
            late_count: counts.late as i32,
            excused_count: counts.excused as i32,
            attendance_rate,
            punctuality_rate: rules::punctuality_rate(counts.present, counts.late),
            previous_period_rate,
            trend: rules::trend(attendance_rate, previous_period_rate),
        })
        .await
        .map_err(|e| internal_error("Failed to generate summary", e))?;

    info!(
        "生成学生 {} 班级 {} 的{}汇总（{} 起）",
        student.admission_number, class.class_code, summary.period_type, summary.period_start
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "Summary generated successfully")))
}

/// 学生只能查看自己的汇总
pub async fn list_summaries(
    service: &AttendanceService,
    query: SummaryQueryParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let student_id = if user.user_type == UserType::Student {
        let own = storage
            .get_student_by_user_id(user.id)
            .await
            .map_err(|e| internal_error("Failed to retrieve summaries", e))?
            .ok_or_else(|| not_found(ErrorCode::StudentProfileMissing, "Student profile not found"))?;
        if query.student_id.is_some_and(|id| id != own.id) {
            return Err(forbidden(
                ErrorCode::PermissionDenied,
                "You can only view your own summaries",
            ));
        }
        Some(own.id)
    } else {
        query.student_id
    };

    let items = storage
        .list_summaries(student_id, query.class_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve summaries", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SummaryListResponse { items },
        "Summaries retrieved successfully",
    )))
}
