use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::students::requests::{
    CreateAcademicRecordRequest, CreateStudentRequest, EnrollStudentRequest, StudentQueryParams,
    UpdateStudentRequest,
};
use crate::models::users::entities::UserType;
use crate::services::StudentService;
use crate::utils::{SafeEnrollmentIdI64, SafeStudentIdI64};

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentQueryParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(body.into_inner(), &req).await
}

pub async fn student_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.student_dashboard(&req).await
}

pub async fn get_student(req: HttpRequest, id: SafeStudentIdI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeStudentIdI64,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.update_student(id.0, body.into_inner(), &req).await
}

pub async fn delete_student(req: HttpRequest, id: SafeStudentIdI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(id.0, &req).await
}

pub async fn toggle_student_status(
    req: HttpRequest,
    id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.toggle_student_status(id.0, &req).await
}

pub async fn list_enrollments(req: HttpRequest, id: SafeStudentIdI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_enrollments(id.0, &req).await
}

pub async fn enroll_student(
    req: HttpRequest,
    id: SafeStudentIdI64,
    body: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.enroll_student(id.0, body.into_inner(), &req).await
}

pub async fn deactivate_enrollment(
    req: HttpRequest,
    id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.deactivate_enrollment(id.0, &req).await
}

pub async fn list_academic_records(
    req: HttpRequest,
    id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_academic_records(id.0, &req).await
}

pub async fn add_academic_record(
    req: HttpRequest,
    id: SafeStudentIdI64,
    body: web::Json<CreateAcademicRecordRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.add_academic_record(id.0, body.into_inner(), &req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    let staff = || RequireRole::new_any(UserType::staff_roles());
    let management = || RequireRole::new_any(UserType::management_roles());

    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_students).wrap(staff()))
                    .route(web::post().to(create_student).wrap(management())),
            )
            // 学生本人主页，需在 /{student_id} 之前注册
            .service(
                web::resource("/me")
                    .route(web::get().to(student_dashboard).wrap(RequireRole::new(&UserType::Student))),
            )
            .service(
                web::resource("/enrollments/{enrollment_id}/deactivate")
                    .route(web::post().to(deactivate_enrollment).wrap(management())),
            )
            .service(
                web::resource("/{student_id}")
                    .route(web::get().to(get_student).wrap(staff()))
                    .route(web::put().to(update_student).wrap(management()))
                    .route(web::delete().to(delete_student).wrap(management())),
            )
            .service(
                web::resource("/{student_id}/toggle-status")
                    .route(web::post().to(toggle_student_status).wrap(management())),
            )
            .service(
                web::resource("/{student_id}/enrollments")
                    .route(web::get().to(list_enrollments).wrap(staff()))
                    .route(web::post().to(enroll_student).wrap(management())),
            )
            .service(
                web::resource("/{student_id}/academic-records")
                    .route(web::get().to(list_academic_records).wrap(staff()))
                    .route(web::post().to(add_academic_record).wrap(management())),
            ),
    );
}
