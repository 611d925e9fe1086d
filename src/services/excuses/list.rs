use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use super::ExcuseService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::ClassListQuery,
    excuses::{
        requests::{ExcuseListQuery, ExcuseQueryParams},
        responses::ExcuseDetail,
    },
    users::entities::User,
};
use crate::services::scope::{Scope, resolve_scope};
use crate::services::{Reply, current_user, forbidden, internal_error, not_found};
use crate::storage::Storage;

/// 教师任教的全部班级
pub(super) async fn taught_class_ids(
    storage: &Arc<dyn Storage>,
    instructor_id: i64,
) -> Result<Vec<i64>, HttpResponse> {
    Ok(storage
        .list_classes(ClassListQuery {
            instructor_id: Some(instructor_id),
            ..Default::default()
        })
        .await
        .map_err(|e| internal_error("Failed to load classes", e))?
        .into_iter()
        .map(|c| c.id)
        .collect())
}

pub async fn list_excuses(
    service: &ExcuseService,
    query: ExcuseQueryParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut list_query = ExcuseListQuery {
        page: query.page,
        size: query.size,
        status: query.status,
        ..Default::default()
    };
    match resolve_scope(&storage, &user).await? {
        Scope::All => {}
        Scope::Instructor(id) => list_query.class_ids = Some(taught_class_ids(&storage, id).await?),
        Scope::Student { student, .. } => {
            let student = student.ok_or_else(|| {
                not_found(ErrorCode::StudentProfileMissing, "Student profile not found")
            })?;
            list_query.student_id = Some(student.id);
        }
    }

    let response = storage
        .list_excuses_with_pagination(list_query)
        .await
        .map_err(|e| internal_error("Failed to retrieve excuses", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Excuses retrieved successfully")))
}

async fn can_view(
    storage: &Arc<dyn Storage>,
    user: &User,
    detail: &ExcuseDetail,
) -> Result<bool, HttpResponse> {
    let allowed = match resolve_scope(storage, user).await? {
        Scope::All => true,
        Scope::Instructor(id) => storage
            .get_class_by_id(detail.application.class_id)
            .await
            .map_err(|e| internal_error("Failed to retrieve excuse", e))?
            .is_some_and(|c| c.is_taught_by(id)),
        Scope::Student { student, .. } => {
            student.is_some_and(|s| s.id == detail.application.student_id)
        }
    };
    Ok(allowed)
}

pub async fn get_excuse(service: &ExcuseService, excuse_id: i64, request: &HttpRequest) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let detail = storage
        .get_excuse_detail(excuse_id)
        .await
        .map_err(|e| internal_error("Failed to retrieve excuse", e))?
        .ok_or_else(|| not_found(ErrorCode::ExcuseNotFound, "Excuse application not found"))?;

    if !can_view(&storage, &user, &detail).await? {
        return Err(forbidden(
            ErrorCode::ExcusePermissionDenied,
            "You do not have permission to view this excuse application",
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Excuse application retrieved successfully")))
}
