use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use chrono::Datelike;
use tracing::{info, warn};

use super::StudentService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{
        entities::next_admission_number,
        requests::{CreateStudentRequest, NewStudent, StudentProfileInput},
        responses::CreateStudentResponse,
    },
    users::{
        entities::{AccountStatus, UserType},
        requests::NewUser,
    },
};
use crate::services::{Reply, bad_request, conflict, current_user, internal_error, write_error};
use crate::storage::Storage;
use crate::utils::clock::today;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_initial_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone_number, validate_username,
};

/// 关联的班级、课程必须存在
async fn check_profile_references(
    storage: &Arc<dyn Storage>,
    profile: &StudentProfileInput,
) -> Result<(), HttpResponse> {
    if let Some(class_id) = profile.current_class_id
        && storage
            .get_class_by_id(class_id)
            .await
            .map_err(|e| internal_error("Student creation failed", e))?
            .is_none()
    {
        return Err(bad_request(ErrorCode::ClassNotFound, "Class does not exist"));
    }
    if let Some(course_id) = profile.course_id
        && storage
            .get_course_by_id(course_id)
            .await
            .map_err(|e| internal_error("Student creation failed", e))?
            .is_none()
    {
        return Err(bad_request(ErrorCode::CourseNotFound, "Course does not exist"));
    }
    Ok(())
}

/// 未指定学号时按当年序号生成
async fn resolve_admission_number(
    storage: &Arc<dyn Storage>,
    requested: Option<&str>,
) -> Result<String, HttpResponse> {
    if let Some(number) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        if storage
            .get_student_by_admission_number(number)
            .await
            .map_err(|e| internal_error("Student creation failed", e))?
            .is_some()
        {
            return Err(conflict(ErrorCode::StudentAlreadyExists, "Admission number already exists"));
        }
        return Ok(number.to_string());
    }

    let prefix = &AppConfig::get().attendance.admission_prefix;
    let year = today().year();
    let last = storage
        .max_admission_sequence(&format!("{prefix}{year}"))
        .await
        .map_err(|e| internal_error("Student creation failed", e))?;
    Ok(next_admission_number(prefix, year, last))
}

pub async fn create_student(
    service: &StudentService,
    student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> Reply {
    let creator = current_user(request)?;

    student_data
        .validate()
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    let username = student_data.username.trim().to_string();
    let email = student_data.email.trim().to_lowercase();
    validate_username(&username).map_err(|msg| bad_request(ErrorCode::UserNameInvalid, msg))?;
    validate_email(&email).map_err(|msg| bad_request(ErrorCode::UserEmailInvalid, msg))?;
    if let Some(phone) = student_data.phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_phone_number(phone).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }

    let (password, generated_password) = match student_data.password.as_deref() {
        Some(password) if !password.is_empty() => {
            validate_password_simple(password)
                .map_err(|msg| bad_request(ErrorCode::UserPasswordInvalid, msg))?;
            (password.to_string(), None)
        }
        _ => {
            let generated = generate_initial_password();
            (generated.clone(), Some(generated))
        }
    };

    let storage = service.get_storage(request)?;
    if storage
        .get_user_by_username(&username)
        .await
        .map_err(|e| internal_error("Student creation failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::UserNameAlreadyExists, "Username already exists"));
    }
    if storage
        .get_user_by_email(&email)
        .await
        .map_err(|e| internal_error("Student creation failed", e))?
        .is_some()
    {
        return Err(conflict(ErrorCode::UserEmailAlreadyExists, "Email already registered"));
    }
    check_profile_references(&storage, &student_data.profile).await?;
    let admission_number =
        resolve_admission_number(&storage, student_data.profile.admission_number.as_deref()).await?;

    let password_hash =
        hash_password(&password).map_err(|e| internal_error("Password hashing failed", e))?;
    let user = storage
        .create_user(NewUser {
            username,
            email,
            password_hash,
            first_name: student_data.first_name.trim().to_string(),
            last_name: student_data.last_name.trim().to_string(),
            user_type: UserType::Student,
            phone_number: student_data.phone_number.filter(|p| !p.trim().is_empty()),
            department: None,
            account_status: AccountStatus::Approved,
            is_active: true,
            approved_by: Some(creator.id),
        })
        .await
        .map_err(|e| {
            write_error("Student creation failed", e, ErrorCode::UserAlreadyExists, "User already exists")
        })?;

    let county = student_data
        .profile
        .county
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| AppConfig::get().attendance.default_county.clone());

    let student = match storage
        .create_student(NewStudent {
            user_id: user.id,
            admission_number,
            profile: student_data.profile,
            county,
        })
        .await
    {
        Ok(student) => student,
        Err(e) => {
            // 档案写入失败时撤销刚创建的账号
            if let Err(cleanup) = storage.delete_user(user.id).await {
                warn!("回滚学生账号 {} 失败: {cleanup}", user.id);
            }
            return Err(write_error(
                "Student creation failed",
                e,
                ErrorCode::StudentAlreadyExists,
                "Admission number already exists",
            ));
        }
    };

    info!("创建学生 {} (用户 {})", student.admission_number, user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateStudentResponse {
            student,
            user,
            generated_password,
        },
        "Student created successfully",
    )))
}
