pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::models::courses::requests::{CourseQueryParams, CreateCourseRequest, UpdateCourseRequest};

lazy_service!(CourseService);

impl CourseService {
    pub async fn list_courses(
        &self,
        query: CourseQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_courses(self, query, request).await)
    }

    // 下拉框使用的启用课程
    pub async fn list_active_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(list::list_active_courses(self, request).await)
    }

    pub async fn create_course(
        &self,
        course_data: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_course(self, course_data, request).await)
    }

    // 课程详情及班级数量
    pub async fn get_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(get::get_course(self, course_id, request).await)
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update_data: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::update_course(self, course_id, update_data, request).await)
    }

    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(delete::delete_course(self, course_id, request).await)
    }
}
