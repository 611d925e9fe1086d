use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use chrono::{Duration, Utc};
use tracing::info;

use super::AttendanceService;
use super::rules;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::{AttendanceMethod, AttendanceSession, SessionStatus},
        requests::{CreateSessionRequest, NewSession, RecordFilter, SessionListQuery, SessionQueryParams},
        responses::SessionDetailResponse,
    },
    users::entities::User,
};
use crate::services::scope::{Scope, resolve_scope};
use crate::services::{Reply, bad_request, conflict, current_user, forbidden, internal_error, not_found, write_error};
use crate::storage::Storage;
use crate::utils::random_code::generate_qr_token;

pub(super) async fn load_session(
    storage: &Arc<dyn Storage>,
    session_id: i64,
) -> Result<AttendanceSession, HttpResponse> {
    storage
        .get_session_by_id(session_id)
        .await
        .map_err(|e| internal_error("Failed to load session", e))?
        .ok_or_else(|| not_found(ErrorCode::SessionNotFound, "Session not found"))
}

/// 只有课次的任课教师或管理员可以操作
pub(super) async fn load_owned_session(
    storage: &Arc<dyn Storage>,
    session_id: i64,
    user: &User,
) -> Result<AttendanceSession, HttpResponse> {
    let session = load_session(storage, session_id).await?;
    if !session.is_owned_by(user.id) && !user.is_admin() {
        return Err(forbidden(
            ErrorCode::SessionPermissionDenied,
            "You do not have permission to manage this session",
        ));
    }
    Ok(session)
}

pub async fn create_session(
    service: &AttendanceService,
    req: CreateSessionRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    req.validate()
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;

    let storage = service.get_storage(request)?;
    let class = storage
        .get_class_by_id(req.class_id)
        .await
        .map_err(|e| internal_error("Session creation failed", e))?
        .ok_or_else(|| bad_request(ErrorCode::ClassNotFound, "Class does not exist"))?;

    if !class.is_taught_by(user.id) && !user.is_admin() {
        return Err(forbidden(
            ErrorCode::ClassPermissionDenied,
            "You can only create sessions for classes you teach",
        ));
    }

    if storage
        .find_session_slot(class.id, req.session_date, req.start_time)
        .await
        .map_err(|e| internal_error("Session creation failed", e))?
        .is_some()
    {
        return Err(conflict(
            ErrorCode::SessionAlreadyExists,
            "A session already exists for this class at this date and time",
        ));
    }

    let (qr_code_data, qr_code_expiry) = if req.attendance_method == AttendanceMethod::QrCode {
        let validity = Duration::minutes(AppConfig::get().attendance.qr_code_validity_minutes);
        (
            Some(generate_qr_token(class.id)),
            Some((Utc::now() + validity).timestamp()),
        )
    } else {
        (None, None)
    };

    let venue = req
        .venue
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| class.venue.clone());

    let session = storage
        .create_session(NewSession {
            class_id: class.id,
            instructor_id: user.id,
            session_date: req.session_date,
            start_time: req.start_time,
            end_time: req.end_time,
            topic_covered: req.topic_covered.trim().to_string(),
            venue,
            attendance_method: req.attendance_method,
            qr_code_data,
            qr_code_expiry,
        })
        .await
        .map_err(|e| {
            write_error(
                "Session creation failed",
                e,
                ErrorCode::SessionAlreadyExists,
                "A session already exists for this class at this date and time",
            )
        })?;

    // 在读学生默认缺勤
    let student_ids: Vec<i64> = storage
        .list_enrollments_by_class(class.id, true)
        .await
        .map_err(|e| internal_error("Session creation failed", e))?
        .into_iter()
        .map(|e| e.student_id)
        .collect();
    let created = storage
        .create_absent_records(session.id, &student_ids, user.id)
        .await
        .map_err(|e| internal_error("Session creation failed", e))?;
    let session = storage
        .refresh_session_totals(session.id)
        .await
        .map_err(|e| internal_error("Session creation failed", e))?
        .unwrap_or(session);

    info!(
        "用户 {} 创建课次 {}（班级 {}，{} 条记录）",
        user.username, session.id, class.class_code, created
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(session, "Session created successfully")))
}

pub async fn list_sessions(
    service: &AttendanceService,
    query: SessionQueryParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let scope = resolve_scope(&storage, &user).await?;

    let list_query = SessionListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        class_id: query.class_id,
        instructor_id: scope.instructor_id(),
        class_ids: scope.class_ids(),
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
        ascending: false,
    };

    let response = storage
        .list_sessions_with_pagination(list_query)
        .await
        .map_err(|e| internal_error("Failed to retrieve sessions", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Sessions retrieved successfully")))
}

fn can_view(scope: &Scope, session: &AttendanceSession) -> bool {
    match scope {
        Scope::All => true,
        Scope::Instructor(id) => session.is_owned_by(*id),
        Scope::Student { class_ids, .. } => class_ids.contains(&session.class_id),
    }
}

pub async fn get_session(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let session = load_session(&storage, session_id).await?;

    let scope = resolve_scope(&storage, &user).await?;
    if !can_view(&scope, &session) {
        return Err(forbidden(
            ErrorCode::SessionPermissionDenied,
            "You do not have permission to view this session",
        ));
    }

    let class = storage
        .get_class_by_id(session.class_id)
        .await
        .map_err(|e| internal_error("Failed to load session", e))?;

    // 学生只看到自己的记录
    let filter = RecordFilter {
        session_id: Some(session.id),
        student_id: scope.student_id(),
        chronological: true,
        ..Default::default()
    };
    let records = storage
        .list_record_details(filter.clone())
        .await
        .map_err(|e| internal_error("Failed to load attendance records", e))?;
    let counts = storage
        .count_records_by_status(filter)
        .await
        .map_err(|e| internal_error("Failed to count attendance records", e))?;

    let is_active = rules::is_active(&session, Utc::now(), AppConfig::get().school_offset());
    let response = SessionDetailResponse {
        session,
        class,
        records,
        counts,
        is_active,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Session retrieved successfully")))
}

/// 开始、结束、取消课次
pub async fn transition_session(
    service: &AttendanceService,
    session_id: i64,
    next: SessionStatus,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let session = load_owned_session(&storage, session_id, &user).await?;

    if !session.status.can_transition_to(&next) {
        return Err(bad_request(
            ErrorCode::SessionStateInvalid,
            format!("Cannot change session from {} to {}", session.status, next),
        ));
    }

    let mut session = storage
        .update_session_status(session.id, next)
        .await
        .map_err(|e| internal_error("Failed to update session status", e))?
        .ok_or_else(|| not_found(ErrorCode::SessionNotFound, "Session not found"))?;

    if next == SessionStatus::Completed {
        session = storage
            .refresh_session_totals(session.id)
            .await
            .map_err(|e| internal_error("Failed to update session statistics", e))?
            .unwrap_or(session);
    }

    info!("课次 {} 状态变更为 {}", session.id, session.status);
    let message = format!("Session is now {}", session.status);
    Ok(HttpResponse::Ok().json(ApiResponse::success(session, message)))
}
