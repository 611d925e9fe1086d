use actix_web::{HttpRequest, HttpResponse};

use super::AccountService;
use crate::models::{
    ApiResponse, ErrorCode, auth::responses::UserInfoResponse, users::requests::UpdateUserRequest,
};
use crate::services::{
    Reply, bad_request, conflict, current_user, evict_cached_user, forbidden, internal_error,
    not_found, write_error,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_phone_number};

pub async fn update_user(
    service: &AccountService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> Reply {
    let admin = current_user(request)?;
    // 管理员不能修改自己的类型或停用自己
    if admin.id == user_id && (update_data.user_type.is_some() || update_data.is_active == Some(false)) {
        return Err(forbidden(
            ErrorCode::CannotModifySelf,
            "You cannot change your own user type or deactivate yourself",
        ));
    }

    let storage = service.get_storage(request)?;

    if let Some(email) = update_data.email.take() {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
        let taken = storage
            .get_user_by_email(&email)
            .await
            .map_err(|e| internal_error("User update failed", e))?
            .is_some_and(|other| other.id != user_id);
        if taken {
            return Err(conflict(ErrorCode::UserEmailAlreadyExists, "Email already registered"));
        }
        update_data.email = Some(email);
    }

    if let Some(phone) = update_data.phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_phone_number(phone).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    if let Some(password) = update_data.password.take().filter(|p| !p.is_empty()) {
        validate_password_simple(&password)
            .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
        update_data.password =
            Some(hash_password(&password).map_err(|e| internal_error("Password hashing failed", e))?);
    }

    let user = storage
        .update_user(user_id, update_data)
        .await
        .map_err(|e| {
            write_error(
                "User update failed",
                e,
                ErrorCode::UserEmailAlreadyExists,
                "Email already registered",
            )
        })?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;

    evict_cached_user(request, user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfoResponse { user }, "User updated successfully")))
}
