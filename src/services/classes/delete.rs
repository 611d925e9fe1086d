use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Reply, internal_error, not_found};

/// 选课、课次、考勤记录随班级级联删除
pub async fn delete_class(service: &ClassService, class_id: i64, request: &HttpRequest) -> Reply {
    let storage = service.get_storage(request)?;
    let deleted = storage
        .delete_class(class_id)
        .await
        .map_err(|e| internal_error("Class deletion failed", e))?;

    if !deleted {
        return Err(not_found(ErrorCode::ClassNotFound, "Class not found"));
    }

    info!("删除班级 {class_id}");
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Class deleted successfully")))
}
