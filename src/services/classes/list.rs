use actix_web::{HttpRequest, HttpResponse};

use super::ClassService;
use crate::models::{
    ApiResponse,
    classes::requests::{ClassListQuery, ClassQueryParams},
    users::entities::UserType,
};
use crate::services::{Reply, current_user, internal_error};

pub async fn list_classes(
    service: &ClassService,
    query: ClassQueryParams,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search.filter(|s| !s.trim().is_empty()),
        course_id: query.course_id,
        instructor_id: query.instructor_id,
        academic_year: query.academic_year.filter(|s| !s.trim().is_empty()),
        is_active: query.is_active,
    };
    if user.user_type == UserType::Instructor {
        list_query.instructor_id = Some(user.id);
    }

    let response = storage
        .list_classes_with_pagination(list_query)
        .await
        .map_err(|e| internal_error("Failed to retrieve class list", e))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Class list retrieved successfully")))
}
