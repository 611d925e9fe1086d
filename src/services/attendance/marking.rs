use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::AttendanceService;
use super::rules;
use super::sessions::load_owned_session;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::{AttendanceRecord, AttendanceSession, AttendanceStatus},
        requests::{BulkMarkRequest, MarkAttendanceRequest, RecordWrite, UpdateRecordStatusRequest},
        responses::BulkMarkResponse,
    },
};
use crate::services::{Reply, bad_request, current_user, internal_error, not_found};
use crate::storage::Storage;

/// 一次点名写入
pub(super) struct Mark {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub is_excused: Option<bool>,
    /// 指定签到时间（扫码签到），否则沿用已有签到时间
    pub check_in: Option<DateTime<Utc>>,
}

impl Mark {
    pub(super) fn status(student_id: i64, status: AttendanceStatus) -> Self {
        Self {
            student_id,
            status,
            remarks: None,
            is_excused: None,
            check_in: None,
        }
    }
}

/// 写入单条记录；不刷新课次统计
pub(super) async fn apply_mark(
    storage: &Arc<dyn Storage>,
    session: &AttendanceSession,
    mark: Mark,
    marked_by: i64,
    now: DateTime<Utc>,
) -> Result<AttendanceRecord> {
    let offset = AppConfig::get().school_offset();
    let existing = storage.get_record(session.id, mark.student_id).await?;

    let mut check_in = mark
        .check_in
        .or_else(|| existing.as_ref().and_then(|r| r.check_in_time));
    if mark.status.is_checked_in() && check_in.is_none() {
        check_in = Some(now);
    }

    let late_minutes = match (mark.status, check_in) {
        (AttendanceStatus::Late, Some(at)) => {
            rules::late_minutes(rules::session_start(session, offset), at)
        }
        _ => 0,
    };

    let record = storage
        .save_record(RecordWrite {
            session_id: session.id,
            student_id: mark.student_id,
            status: mark.status,
            check_in_time: check_in.map(|at| at.timestamp()),
            marked_by: Some(marked_by),
            is_excused: mark.is_excused,
            remarks: mark.remarks,
            late_minutes,
        })
        .await?;

    if mark.status == AttendanceStatus::Present
        && let Some(at) = record.check_in_time
    {
        let date = at.with_timezone(&offset).date_naive();
        storage
            .update_last_attendance_date(mark.student_id, date)
            .await?;
    }

    Ok(record)
}

/// 写入单条记录并刷新课次统计
pub(super) async fn record_mark(
    storage: &Arc<dyn Storage>,
    session: &AttendanceSession,
    mark: Mark,
    marked_by: i64,
    now: DateTime<Utc>,
) -> Result<AttendanceRecord> {
    let record = apply_mark(storage, session, mark, marked_by, now).await?;
    storage.refresh_session_totals(session.id).await?;
    Ok(record)
}

pub async fn mark_attendance(
    service: &AttendanceService,
    session_id: i64,
    req: MarkAttendanceRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let session = load_owned_session(&storage, session_id, &user).await?;

    let student = storage
        .get_student_by_id(req.student_id)
        .await
        .map_err(|e| internal_error("Failed to mark attendance", e))?
        .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?;

    let mark = Mark {
        student_id: student.id,
        status: req.status,
        remarks: Some(req.remarks.trim().to_string()),
        is_excused: Some(req.is_excused),
        check_in: None,
    };
    let record = record_mark(&storage, &session, mark, user.id, Utc::now())
        .await
        .map_err(|e| internal_error("Failed to mark attendance", e))?;

    info!(
        "课次 {} 学生 {} 标记为 {}",
        session.id, student.admission_number, record.status
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(record, "Attendance marked successfully")))
}

pub async fn bulk_mark_attendance(
    service: &AttendanceService,
    session_id: i64,
    mut req: BulkMarkRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let session = load_owned_session(&storage, session_id, &user).await?;

    let mut requested: Vec<i64> = req.statuses.keys().copied().collect();
    requested.sort_unstable();
    let known: HashSet<i64> = storage
        .list_students_by_ids(&requested)
        .await
        .map_err(|e| internal_error("Bulk attendance failed", e))?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let now = Utc::now();
    let mut updated = 0u64;
    let mut skipped = Vec::new();
    for student_id in requested {
        let Some(status) = req.statuses.get(&student_id).copied() else {
            continue;
        };
        if !known.contains(&student_id) {
            skipped.push(student_id);
            continue;
        }
        let mut mark = Mark::status(student_id, status);
        mark.remarks = req.remarks.remove(&student_id).map(|r| r.trim().to_string());
        match apply_mark(&storage, &session, mark, user.id, now).await {
            Ok(_) => updated += 1,
            Err(e) => {
                warn!("课次 {} 学生 {} 点名失败: {}", session.id, student_id, e);
                skipped.push(student_id);
            }
        }
    }

    let session = storage
        .refresh_session_totals(session.id)
        .await
        .map_err(|e| internal_error("Failed to update session statistics", e))?
        .unwrap_or(session);

    info!("课次 {} 批量点名 {} 人，跳过 {} 人", session.id, updated, skipped.len());
    let message = format!("Attendance updated for {updated} students");
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        BulkMarkResponse {
            updated,
            skipped,
            session,
        },
        message,
    )))
}

/// 前端下拉框直接修改记录状态
pub async fn update_record_status(
    service: &AttendanceService,
    record_id: i64,
    req: UpdateRecordStatusRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let record = storage
        .get_record_by_id(record_id)
        .await
        .map_err(|e| internal_error("Failed to update attendance", e))?
        .ok_or_else(|| not_found(ErrorCode::RecordNotFound, "Attendance record not found"))?;
    let session = load_owned_session(&storage, record.session_id, &user).await?;

    let status = req
        .status
        .trim()
        .parse::<AttendanceStatus>()
        .map_err(|_| bad_request(ErrorCode::AttendanceStatusInvalid, "Invalid attendance status"))?;

    let mut mark = Mark::status(record.student_id, status);
    mark.remarks = req.remarks.map(|r| r.trim().to_string());
    let record = record_mark(&storage, &session, mark, user.id, Utc::now())
        .await
        .map_err(|e| internal_error("Failed to update attendance", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(record, "Attendance status updated successfully")))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::attendance::{entities::AttendanceMethod, requests::NewSession};
    use crate::models::users::entities::{AccountStatus, UserType};
    use crate::storage::sea_orm_storage::tests::{
        new_user, seed_class, seed_course, seed_student, storage,
    };

    struct Fixture {
        storage: Arc<dyn Storage>,
        instructor_id: i64,
        session: AttendanceSession,
        students: Vec<i64>,
        start: DateTime<Utc>,
    }

    async fn fixture() -> Fixture {
        let storage = storage().await;
        let instructor = storage
            .create_user_impl(new_user("nkilonzo", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "AUTO").await;
        let class = seed_class(&storage, course.id, "AUTO-1", Some(instructor.id)).await;
        let students = vec![
            seed_student(&storage, "mutheu", "TVET20250031").await.id,
            seed_student(&storage, "kyalo", "TVET20250032").await.id,
        ];
        let session = storage
            .create_session_impl(NewSession {
                class_id: class.id,
                instructor_id: instructor.id,
                session_date: "2025-03-03".parse().unwrap(),
                start_time: "08:00:00".parse().unwrap(),
                end_time: "10:00:00".parse().unwrap(),
                topic_covered: "Engine timing".to_string(),
                venue: "Garage".to_string(),
                attendance_method: AttendanceMethod::Manual,
                qr_code_data: None,
                qr_code_expiry: None,
            })
            .await
            .unwrap();
        let start = rules::session_start(&session, AppConfig::get().school_offset());

        Fixture {
            storage: Arc::new(storage),
            instructor_id: instructor.id,
            session,
            students,
            start,
        }
    }

    #[tokio::test]
    async fn test_present_sets_check_in_and_last_attendance() {
        let f = fixture().await;
        let now = f.start + Duration::minutes(5);
        let record = apply_mark(
            &f.storage,
            &f.session,
            Mark::status(f.students[0], AttendanceStatus::Present),
            f.instructor_id,
            now,
        )
        .await
        .unwrap();

        assert_eq!(record.check_in_time, Some(now));
        assert_eq!(record.late_minutes, 0);
        assert_eq!(record.marked_by, Some(f.instructor_id));

        let student = f.storage.get_student_by_id(f.students[0]).await.unwrap().unwrap();
        assert_eq!(student.last_attendance_date, Some(f.session.session_date));
    }

    #[tokio::test]
    async fn test_late_minutes_counted_from_session_start() {
        let f = fixture().await;
        let now = f.start + Duration::minutes(25);
        let record = apply_mark(
            &f.storage,
            &f.session,
            Mark::status(f.students[0], AttendanceStatus::Late),
            f.instructor_id,
            now,
        )
        .await
        .unwrap();

        assert_eq!(record.check_in_time, Some(now));
        assert_eq!(record.late_minutes, 25);
    }

    #[tokio::test]
    async fn test_remark_keeps_first_check_in() {
        let f = fixture().await;
        let first = f.start + Duration::minutes(12);
        apply_mark(
            &f.storage,
            &f.session,
            Mark::status(f.students[0], AttendanceStatus::Present),
            f.instructor_id,
            first,
        )
        .await
        .unwrap();

        let record = apply_mark(
            &f.storage,
            &f.session,
            Mark::status(f.students[0], AttendanceStatus::Late),
            f.instructor_id,
            f.start + Duration::minutes(40),
        )
        .await
        .unwrap();
        assert_eq!(record.check_in_time, Some(first));
        assert_eq!(record.late_minutes, 12);
    }

    #[tokio::test]
    async fn test_absent_has_no_check_in() {
        let f = fixture().await;
        let record = apply_mark(
            &f.storage,
            &f.session,
            Mark::status(f.students[1], AttendanceStatus::Absent),
            f.instructor_id,
            f.start,
        )
        .await
        .unwrap();

        assert!(record.check_in_time.is_none());
        let student = f.storage.get_student_by_id(f.students[1]).await.unwrap().unwrap();
        assert!(student.last_attendance_date.is_none());
    }

    #[tokio::test]
    async fn test_record_mark_refreshes_session_totals() {
        let f = fixture().await;
        record_mark(
            &f.storage,
            &f.session,
            Mark::status(f.students[0], AttendanceStatus::Present),
            f.instructor_id,
            f.start,
        )
        .await
        .unwrap();
        record_mark(
            &f.storage,
            &f.session,
            Mark::status(f.students[1], AttendanceStatus::Late),
            f.instructor_id,
            f.start + Duration::minutes(15),
        )
        .await
        .unwrap();

        let session = f.storage.get_session_by_id(f.session.id).await.unwrap().unwrap();
        assert_eq!(session.total_present, 1);
        assert_eq!(session.total_late, 1);
        assert_eq!(session.total_absent, 0);
    }
}
