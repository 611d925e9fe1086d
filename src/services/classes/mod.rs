pub mod create;
pub mod delete;
pub mod enroll;
pub mod get;
pub mod instructor;
pub mod list;
pub mod mine;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::models::classes::requests::{
    AssignInstructorRequest, ClassQueryParams, CreateClassRequest, EnrollStudentsRequest,
    UpdateClassRequest,
};

lazy_service!(ClassService);

impl ClassService {
    // 获取班级列表，教师只看到自己任教的班级
    pub async fn list_classes(
        &self,
        query: ClassQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_classes(self, query, request).await)
    }

    pub async fn create_class(
        &self,
        class_data: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_class(self, class_data, request).await)
    }

    pub async fn get_class(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(get::get_class(self, request).await)
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        update_data: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::update_class(self, class_id, update_data, request).await)
    }

    pub async fn delete_class(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(delete::delete_class(self, class_id, request).await)
    }

    pub async fn assign_instructor(
        &self,
        class_id: i64,
        req: AssignInstructorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(instructor::assign_instructor(self, class_id, req, request).await)
    }

    pub async fn unassign_instructor(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(instructor::unassign_instructor(self, class_id, request).await)
    }

    // 批量选课
    pub async fn enroll_students(
        &self,
        class_id: i64,
        req: EnrollStudentsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(enroll::enroll_students(self, class_id, req, request).await)
    }

    // 班级学生及出勤统计
    pub async fn class_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(students::class_students(self, request).await)
    }

    pub async fn instructor_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(mine::instructor_classes(self, request).await)
    }

    pub async fn student_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(mine::student_classes(self, request).await)
    }
}
