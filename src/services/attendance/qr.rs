use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::AttendanceService;
use super::marking::{Mark, record_mark};
use super::rules::{self, QrRejection};
use super::sessions::{load_owned_session, load_session};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::{AttendanceRecord, AttendanceSession, AttendanceStatus, SessionStatus},
        requests::QrCheckInRequest,
        responses::QrCodeResponse,
    },
    users::entities::UserType,
};
use crate::services::{Reply, bad_request, current_user, forbidden, internal_error, not_found};
use crate::storage::Storage;
use crate::utils::random_code::generate_qr_token;

fn qr_response(session: &AttendanceSession) -> QrCodeResponse {
    QrCodeResponse {
        session_id: session.id,
        qr_code_data: session.qr_code_data.clone().unwrap_or_default(),
        qr_code_expiry: session.qr_code_expiry,
        is_expired: rules::qr_expired(session, Utc::now()),
    }
}

pub async fn view_qr(service: &AttendanceService, session_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let session = load_owned_session(&storage, session_id, &user).await?;

    if session.qr_code_data.as_deref().is_none_or(str::is_empty) {
        return Err(not_found(
            ErrorCode::QrCodeInvalid,
            "This session has no QR code, regenerate one first",
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(qr_response(&session), "QR code retrieved successfully")))
}

pub async fn regenerate_qr(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let session = load_owned_session(&storage, session_id, &user).await?;

    let token = generate_qr_token(session.class_id);
    let validity = Duration::minutes(AppConfig::get().attendance.qr_code_validity_minutes);
    let expiry = (Utc::now() + validity).timestamp();
    let session = storage
        .update_session_qr(session.id, &token, expiry)
        .await
        .map_err(|e| internal_error("Failed to regenerate QR code", e))?
        .ok_or_else(|| not_found(ErrorCode::SessionNotFound, "Session not found"))?;

    info!("课次 {} 重新生成二维码", session.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(qr_response(&session), "QR code regenerated successfully")))
}

/// 确认学生在该班有效选课后记为出勤，签到时间取 `now`
pub(super) async fn check_in_student(
    storage: &Arc<dyn Storage>,
    session: &AttendanceSession,
    student_id: i64,
    marked_by: i64,
    now: DateTime<Utc>,
) -> Result<AttendanceRecord, HttpResponse> {
    let enrolled = storage
        .get_enrollment(student_id, session.class_id)
        .await
        .map_err(|e| internal_error("QR check-in failed", e))?
        .is_some_and(|e| e.is_active);
    if !enrolled {
        return Err(forbidden(
            ErrorCode::NotEnrolled,
            "Student is not enrolled in this class",
        ));
    }

    let mark = Mark {
        check_in: Some(now),
        ..Mark::status(student_id, AttendanceStatus::Present)
    };
    record_mark(storage, session, mark, marked_by, now)
        .await
        .map_err(|e| internal_error("QR check-in failed", e))
}

/// 学生扫码签到自己；教职工可以代签指定学生
pub async fn qr_check_in(
    service: &AttendanceService,
    session_id: i64,
    req: QrCheckInRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let session = load_session(&storage, session_id).await?;

    if matches!(session.status, SessionStatus::Completed | SessionStatus::Cancelled) {
        return Err(bad_request(
            ErrorCode::SessionStateInvalid,
            "Attendance is closed for this session",
        ));
    }

    let now = Utc::now();
    rules::check_qr_code(&session, &req.code, now).map_err(|rejection| match rejection {
        QrRejection::Invalid => bad_request(ErrorCode::QrCodeInvalid, "Invalid QR code"),
        QrRejection::Expired => bad_request(ErrorCode::QrCodeExpired, "QR code has expired"),
    })?;

    let student = if user.user_type == UserType::Student {
        storage
            .get_student_by_user_id(user.id)
            .await
            .map_err(|e| internal_error("QR check-in failed", e))?
            .ok_or_else(|| not_found(ErrorCode::StudentProfileMissing, "Student profile not found"))?
    } else {
        if !session.is_owned_by(user.id) && !user.is_admin() {
            return Err(forbidden(
                ErrorCode::SessionPermissionDenied,
                "You do not have permission to manage this session",
            ));
        }
        let student_id = req
            .student_id
            .ok_or_else(|| bad_request(ErrorCode::ValidationFailed, "student_id is required"))?;
        storage
            .get_student_by_id(student_id)
            .await
            .map_err(|e| internal_error("QR check-in failed", e))?
            .ok_or_else(|| not_found(ErrorCode::StudentNotFound, "Student not found"))?
    };

    let record = check_in_student(&storage, &session, student.id, user.id, now).await?;

    info!("学生 {} 扫码签到课次 {}", student.admission_number, session.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(record, "Check-in successful")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::attendance::{entities::AttendanceMethod, requests::NewSession};
    use crate::models::students::{entities::EnrollmentType, requests::NewEnrollment};
    use crate::models::users::entities::{AccountStatus, UserType};
    use crate::storage::sea_orm_storage::tests::{
        new_user, seed_class, seed_course, seed_student, storage,
    };

    struct Fixture {
        storage: Arc<dyn Storage>,
        instructor_id: i64,
        course_id: i64,
        session: AttendanceSession,
        student_id: i64,
    }

    async fn fixture() -> Fixture {
        let storage = storage().await;
        let instructor = storage
            .create_user_impl(new_user("cmbithi", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "WELD").await;
        let class = seed_class(&storage, course.id, "WELD-1", Some(instructor.id)).await;
        let student = seed_student(&storage, "nduku", "TVET20250041").await;
        let session = storage
            .create_session_impl(NewSession {
                class_id: class.id,
                instructor_id: instructor.id,
                session_date: "2025-03-04".parse().unwrap(),
                start_time: "09:00:00".parse().unwrap(),
                end_time: "11:00:00".parse().unwrap(),
                topic_covered: "Arc welding".to_string(),
                venue: "Bay 2".to_string(),
                attendance_method: AttendanceMethod::QrCode,
                qr_code_data: Some("WELD-TOKEN".to_string()),
                qr_code_expiry: None,
            })
            .await
            .unwrap();

        Fixture {
            storage: Arc::new(storage),
            instructor_id: instructor.id,
            course_id: course.id,
            session,
            student_id: student.id,
        }
    }

    async fn enroll(f: &Fixture) -> i64 {
        f.storage
            .create_enrollment(NewEnrollment {
                student_id: f.student_id,
                course_id: f.course_id,
                class_id: f.session.class_id,
                enrollment_date: "2025-01-06".parse().unwrap(),
                enrollment_type: EnrollmentType::Regular,
                remarks: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_check_in_rejects_student_outside_class() {
        let f = fixture().await;
        let err = check_in_student(&f.storage, &f.session, f.student_id, f.instructor_id, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let record = f.storage.get_record(f.session.id, f.student_id).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_check_in_rejects_inactive_enrollment() {
        let f = fixture().await;
        let enrollment_id = enroll(&f).await;
        f.storage
            .set_enrollment_active(enrollment_id, false)
            .await
            .unwrap();

        let err = check_in_student(&f.storage, &f.session, f.student_id, f.instructor_id, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_check_in_marks_enrolled_student_present() {
        let f = fixture().await;
        enroll(&f).await;
        let start = rules::session_start(&f.session, AppConfig::get().school_offset());
        let now = start + Duration::minutes(3);

        let record = check_in_student(&f.storage, &f.session, f.student_id, f.instructor_id, now)
            .await
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.check_in_time, Some(now));

        let session = f.storage.get_session_by_id(f.session.id).await.unwrap().unwrap();
        assert_eq!(session.total_present, 1);
    }
}
