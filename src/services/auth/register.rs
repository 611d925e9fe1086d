use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{RegisterRequest, responses::UserInfoResponse},
    users::{
        entities::{AccountStatus, UserType},
        requests::NewUser,
    },
};
use crate::services::{Reply, bad_request, conflict, internal_error, write_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone_number, validate_username,
};

/// 自助注册只开放学生账号，注册后直接通过审核
pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> Reply {
    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    validate_username(&username).map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    validate_email(&email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    if let Some(phone) = register_request.phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_phone_number(phone).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    if register_request.password != register_request.password_confirm {
        return Err(bad_request(
            ErrorCode::UserPasswordInvalid,
            "The two password fields didn't match",
        ));
    }
    validate_password_simple(&register_request.password)
        .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;

    let storage = service.get_storage(request)?;

    if storage
        .get_user_by_username(&username)
        .await
        .map_err(|e| internal_error("Registration failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::UserNameAlreadyExists, "Username already exists"));
    }
    if storage
        .get_user_by_email(&email)
        .await
        .map_err(|e| internal_error("Registration failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::UserEmailAlreadyExists, "Email already registered"));
    }

    let password_hash = hash_password(&register_request.password)
        .map_err(|e| internal_error("Password hashing failed", e))?;

    let user = storage
        .create_user(NewUser {
            username,
            email,
            password_hash,
            first_name: register_request.first_name.trim().to_string(),
            last_name: register_request.last_name.trim().to_string(),
            user_type: UserType::Student,
            phone_number: register_request.phone_number.filter(|p| !p.trim().is_empty()),
            department: None,
            account_status: AccountStatus::Approved,
            is_active: true,
            approved_by: None,
        })
        .await
        .map_err(|e| {
            write_error(
                "Registration failed",
                e,
                ErrorCode::UserAlreadyExists,
                "Username or email already exists",
            )
        })?;

    info!("新学生账号注册: {} ({})", user.username, user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserInfoResponse { user },
        "Registration successful! You can now log in.",
    )))
}
