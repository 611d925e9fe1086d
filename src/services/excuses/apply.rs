use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ExcuseService;
use crate::models::{
    ApiResponse, ErrorCode,
    excuses::requests::{ApplyExcuseRequest, NewExcuse},
};
use crate::services::{Reply, bad_request, current_user, forbidden, internal_error, not_found};
use crate::utils::clock::today;

/// 学生为自己选修的班级提交请假
pub async fn apply_excuse(
    service: &ExcuseService,
    req: ApplyExcuseRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let student = storage
        .get_student_by_user_id(user.id)
        .await
        .map_err(|e| internal_error("Failed to submit excuse", e))?
        .ok_or_else(|| {
            forbidden(
                ErrorCode::StudentProfileMissing,
                "Only students with a profile can apply for excuses",
            )
        })?;

    req.validate(today())
        .map_err(|msg| bad_request(ErrorCode::ExcuseInvalid, msg))?;

    let enrolled = storage
        .get_enrollment(student.id, req.class_id)
        .await
        .map_err(|e| internal_error("Failed to submit excuse", e))?
        .is_some_and(|e| e.is_active);
    if !enrolled {
        return Err(bad_request(
            ErrorCode::NotEnrolled,
            "You are not enrolled in this class",
        ));
    }

    if let Some(session_id) = req.attendance_session_id {
        let session = storage
            .get_session_by_id(session_id)
            .await
            .map_err(|e| internal_error("Failed to submit excuse", e))?
            .ok_or_else(|| not_found(ErrorCode::SessionNotFound, "Session not found"))?;
        if session.class_id != req.class_id {
            return Err(bad_request(
                ErrorCode::ExcuseInvalid,
                "Session does not belong to this class",
            ));
        }
    }

    let excuse = storage
        .create_excuse(NewExcuse {
            student_id: student.id,
            class_id: req.class_id,
            attendance_session_id: req.attendance_session_id,
            reason: req.reason.trim().to_string(),
            start_date: req.start_date,
            end_date: req.end_date,
        })
        .await
        .map_err(|e| internal_error("Failed to submit excuse", e))?;

    info!(
        "学生 {} 提交请假 {}（{} 至 {}）",
        student.admission_number, excuse.id, excuse.start_date, excuse.end_date
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(excuse, "Excuse application submitted successfully")))
}
