use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AccountService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::responses::UserInfoResponse,
    users::{
        entities::AccountStatus,
        requests::{CreateUserRequest, NewUser},
    },
};
use crate::services::{Reply, bad_request, conflict, current_user, internal_error, write_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone_number, validate_username,
};

/// 管理员创建的账号默认直接通过审核
pub async fn create_user(
    service: &AccountService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> Reply {
    let admin = current_user(request)?;

    let username = user_data.username.trim().to_string();
    let email = user_data.email.trim().to_lowercase();
    validate_username(&username).map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    validate_email(&email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    validate_password_simple(&user_data.password)
        .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
    if let Some(phone) = user_data.phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_phone_number(phone).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let storage = service.get_storage(request)?;
    if storage
        .get_user_by_username(&username)
        .await
        .map_err(|e| internal_error("User creation failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::UserNameAlreadyExists, "Username already exists"));
    }
    if storage
        .get_user_by_email(&email)
        .await
        .map_err(|e| internal_error("User creation failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::UserEmailAlreadyExists, "Email already registered"));
    }

    let account_status = user_data.account_status.unwrap_or(AccountStatus::Approved);
    let approved = account_status == AccountStatus::Approved;
    let password_hash =
        hash_password(&user_data.password).map_err(|e| internal_error("Password hashing failed", e))?;

    let user = storage
        .create_user(NewUser {
            username,
            email,
            password_hash,
            first_name: user_data.first_name.trim().to_string(),
            last_name: user_data.last_name.trim().to_string(),
            user_type: user_data.user_type,
            phone_number: user_data.phone_number.filter(|p| !p.trim().is_empty()),
            department: user_data.department.filter(|d| !d.trim().is_empty()),
            account_status,
            is_active: approved,
            approved_by: approved.then_some(admin.id),
        })
        .await
        .map_err(|e| {
            write_error(
                "User creation failed",
                e,
                ErrorCode::UserAlreadyExists,
                "Username or email already exists",
            )
        })?;

    info!("管理员 {} 创建了用户 {} ({})", admin.id, user.username, user.user_type);
    Ok(HttpResponse::Created().json(ApiResponse::success(UserInfoResponse { user }, "User created successfully")))
}
