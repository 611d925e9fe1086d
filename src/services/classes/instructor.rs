use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode, classes::requests::AssignInstructorRequest,
    users::entities::UserType,
};
use crate::services::{Reply, bad_request, internal_error, not_found};
use crate::storage::Storage;

/// 只有 instructor 类型的用户可以任课
pub(super) async fn ensure_instructor(
    storage: &Arc<dyn Storage>,
    instructor_id: i64,
) -> Result<(), HttpResponse> {
    let user = storage
        .get_user_by_id(instructor_id)
        .await
        .map_err(|e| internal_error("Failed to load instructor", e))?;

    match user {
        Some(user) if user.user_type == UserType::Instructor => Ok(()),
        _ => Err(bad_request(
            ErrorCode::InstructorInvalid,
            "Selected user is not an instructor",
        )),
    }
}

pub async fn assign_instructor(
    service: &ClassService,
    class_id: i64,
    req: AssignInstructorRequest,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    ensure_instructor(&storage, req.instructor_id).await?;

    let class = storage
        .set_class_instructor(class_id, Some(req.instructor_id))
        .await
        .map_err(|e| internal_error("Failed to assign instructor", e))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;

    info!("班级 {} 分配教师 {}", class.class_code, req.instructor_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Instructor assigned successfully")))
}

pub async fn unassign_instructor(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> Reply {
    let storage = service.get_storage(request)?;
    let class = storage
        .set_class_instructor(class_id, None)
        .await
        .map_err(|e| internal_error("Failed to unassign instructor", e))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;

    info!("班级 {} 取消任课教师", class.class_code);
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Instructor unassigned successfully")))
}
