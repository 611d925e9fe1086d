use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireClassAccess, RequireRole};
use crate::models::classes::requests::{
    AssignInstructorRequest, ClassQueryParams, CreateClassRequest, EnrollStudentsRequest,
    UpdateClassRequest,
};
use crate::models::students::requests::ClassRosterQuery;
use crate::models::users::entities::UserType;
use crate::services::{ClassService, StudentService};
use crate::utils::SafeClassIdI64;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(query.into_inner(), &req).await
}

pub async fn create_class(
    req: HttpRequest,
    body: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.create_class(body.into_inner(), &req).await
}

pub async fn instructor_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.instructor_classes(&req).await
}

pub async fn student_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.student_classes(&req).await
}

// 班级由 RequireClassAccess 加载
pub async fn get_class(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.update_class(class_id.0, body.into_inner(), &req).await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(class_id.0, &req).await
}

pub async fn assign_instructor(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<AssignInstructorRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.assign_instructor(class_id.0, body.into_inner(), &req).await
}

pub async fn unassign_instructor(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.unassign_instructor(class_id.0, &req).await
}

pub async fn enroll_students(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<EnrollStudentsRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.enroll_students(class_id.0, body.into_inner(), &req).await
}

pub async fn class_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.class_students(&req).await
}

pub async fn students_by_class(
    req: HttpRequest,
    query: web::Query<ClassRosterQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.students_by_class(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    let staff = || RequireRole::new_any(UserType::staff_roles());
    let management = || RequireRole::new_any(UserType::management_roles());

    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 教师只看到自己任教的班级
                    .route(web::get().to(list_classes).wrap(staff()))
                    .route(web::post().to(create_class).wrap(management())),
            )
            .service(
                web::resource("/mine")
                    .route(web::get().to(instructor_classes).wrap(RequireRole::new(&UserType::Instructor))),
            )
            .service(
                web::resource("/enrolled")
                    .route(web::get().to(student_classes).wrap(RequireRole::new(&UserType::Student))),
            )
            .service(
                web::resource("/{class_id}")
                    .route(web::get().to(get_class).wrap(RequireClassAccess))
                    .route(web::put().to(update_class).wrap(management()))
                    .route(web::delete().to(delete_class).wrap(management())),
            )
            .service(
                web::resource("/{class_id}/instructor")
                    .wrap(management())
                    .route(web::put().to(assign_instructor))
                    .route(web::delete().to(unassign_instructor)),
            )
            .service(
                web::resource("/{class_id}/enroll")
                    .route(web::post().to(enroll_students).wrap(management())),
            )
            .service(
                web::resource("/{class_id}/students")
                    .wrap(RequireClassAccess)
                    .route(web::get().to(class_students).wrap(staff())),
            )
            .service(
                web::resource("/{class_id}/attendance-stats")
                    .wrap(RequireClassAccess)
                    .route(web::get().to(students_by_class).wrap(staff())),
            ),
    );
}
