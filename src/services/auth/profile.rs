use actix_web::{HttpRequest, HttpResponse};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{UpdateProfileRequest, responses::UserInfoResponse},
    users::requests::UpdateUserRequest,
};
use crate::services::{
    Reply, bad_request, conflict, current_user, evict_cached_user, internal_error, not_found,
    write_error,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_phone_number};

pub async fn handle_update_profile(
    service: &AuthService,
    update_request: UpdateProfileRequest,
    request: &HttpRequest,
) -> Reply {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let email = match update_request.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            validate_email(&email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
            let taken = storage
                .get_user_by_email(&email)
                .await
                .map_err(|e| internal_error("Failed to update profile", e))?
                .is_some_and(|other| other.id != user.id);
            if taken {
                return Err(conflict(
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already registered",
                ));
            }
            Some(email)
        }
        None => None,
    };

    if let Some(phone) = update_request.phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_phone_number(phone).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let password = match update_request.password.filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password_simple(&password)
                .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
            Some(hash_password(&password).map_err(|e| internal_error("Password hashing failed", e))?)
        }
        None => None,
    };

    let updated = storage
        .update_user(
            user.id,
            UpdateUserRequest {
                email,
                password,
                first_name: update_request.first_name.map(|s| s.trim().to_string()),
                last_name: update_request.last_name.map(|s| s.trim().to_string()),
                phone_number: update_request.phone_number,
                ..Default::default()
            },
        )
        .await
        .map_err(|e| {
            write_error(
                "Failed to update profile",
                e,
                ErrorCode::UserEmailAlreadyExists,
                "Email already registered",
            )
        })?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;

    evict_cached_user(request, user.id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user: updated },
        "Profile updated successfully",
    )))
}
