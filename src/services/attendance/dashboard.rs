use actix_web::{HttpRequest, HttpResponse};
use chrono::Duration;

use super::AttendanceService;
use super::rules::attendance_rate;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse,
    attendance::{
        entities::SessionStatus,
        requests::{RecordFilter, SessionListQuery},
        responses::AttendanceDashboardResponse,
    },
};
use crate::services::scope::{Scope, resolve_scope};
use crate::services::{Reply, current_user, internal_error};
use crate::utils::clock::today;

const UPCOMING_LIMIT: u64 = 5;
const RECENT_LIMIT: u64 = 10;

/// 考勤首页：进行中、今日、即将开始的课次和今日统计
pub async fn attendance_dashboard(service: &AttendanceService, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let scope = resolve_scope(&storage, &user).await?;
    let today = today();

    let base = SessionListQuery {
        instructor_id: scope.instructor_id(),
        class_ids: scope.class_ids(),
        ascending: true,
        ..Default::default()
    };

    let active_sessions = storage
        .list_sessions(
            SessionListQuery {
                status: Some(SessionStatus::Ongoing),
                ..base.clone()
            },
            None,
        )
        .await
        .map_err(|e| internal_error("Failed to load dashboard", e))?;

    let today_sessions = storage
        .list_sessions(
            SessionListQuery {
                date_from: Some(today),
                date_to: Some(today),
                ..base.clone()
            },
            None,
        )
        .await
        .map_err(|e| internal_error("Failed to load dashboard", e))?;

    // 管理端包含今天尚未开始的课次，其余角色从明天算起
    let upcoming_from = match &scope {
        Scope::All => today,
        _ => today + Duration::days(1),
    };
    let upcoming_sessions = storage
        .list_sessions(
            SessionListQuery {
                status: Some(SessionStatus::Scheduled),
                date_from: Some(upcoming_from),
                ..base.clone()
            },
            Some(UPCOMING_LIMIT),
        )
        .await
        .map_err(|e| internal_error("Failed to load dashboard", e))?;

    let mut today_filter = RecordFilter {
        instructor_id: scope.instructor_id(),
        date_from: Some(today),
        date_to: Some(today),
        ..Default::default()
    };
    if let Scope::Student { student, .. } = &scope {
        today_filter.student_id = Some(student.as_ref().map_or(-1, |s| s.id));
    }
    let today_counts = storage
        .count_records_by_status(today_filter)
        .await
        .map_err(|e| internal_error("Failed to load dashboard", e))?;

    let (recent_attendance, rate) = match &scope {
        Scope::Student {
            student: Some(student),
            class_ids,
        } => {
            let recent = storage
                .list_record_details(RecordFilter {
                    student_id: Some(student.id),
                    limit: Some(RECENT_LIMIT),
                    ..Default::default()
                })
                .await
                .map_err(|e| internal_error("Failed to load dashboard", e))?;

            // 自建档以来所在班级的课次
            let since = student
                .created_at
                .with_timezone(&AppConfig::get().school_offset())
                .date_naive();
            let total_sessions = storage
                .count_sessions(SessionListQuery {
                    class_ids: Some(class_ids.clone()),
                    date_from: Some(since),
                    ..Default::default()
                })
                .await
                .map_err(|e| internal_error("Failed to load dashboard", e))?;
            let counts = storage
                .count_records_by_status(RecordFilter {
                    student_id: Some(student.id),
                    date_from: Some(since),
                    ..Default::default()
                })
                .await
                .map_err(|e| internal_error("Failed to load dashboard", e))?;

            (Some(recent), Some(attendance_rate(counts.present, total_sessions)))
        }
        Scope::Student { student: None, .. } => (Some(Vec::new()), Some(0.0)),
        _ => (None, None),
    };

    let response = AttendanceDashboardResponse {
        active_sessions,
        today_sessions,
        upcoming_sessions,
        today_present: today_counts.present,
        today_absent: today_counts.absent,
        today_late: today_counts.late,
        recent_attendance,
        attendance_rate: rate,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Dashboard retrieved successfully")))
}
