pub mod create;
pub mod delete;
pub mod enrollments;
pub mod get;
pub mod list;
pub mod records;
pub mod roster;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::models::students::requests::{
    ClassRosterQuery, CreateAcademicRecordRequest, CreateStudentRequest, EnrollStudentRequest,
    StudentQueryParams, UpdateStudentRequest,
};

lazy_service!(StudentService);

impl StudentService {
    pub async fn list_students(
        &self,
        query: StudentQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_students(self, query, request).await)
    }

    // 同时创建账号与学籍档案
    pub async fn create_student(
        &self,
        student_data: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_student(self, student_data, request).await)
    }

    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(get::get_student(self, student_id, request).await)
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        update_data: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::update_student(self, student_id, update_data, request).await)
    }

    pub async fn delete_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(delete::delete_student(self, student_id, request).await)
    }

    // active 与 inactive 之间切换
    pub async fn toggle_student_status(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::toggle_student_status(self, student_id, request).await)
    }

    // 学生本人主页
    pub async fn student_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(get::student_dashboard(self, request).await)
    }

    pub async fn enroll_student(
        &self,
        student_id: i64,
        req: EnrollStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(enrollments::enroll_student(self, student_id, req, request).await)
    }

    pub async fn list_enrollments(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(enrollments::list_enrollments(self, student_id, request).await)
    }

    pub async fn deactivate_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(enrollments::deactivate_enrollment(self, enrollment_id, request).await)
    }

    pub async fn add_academic_record(
        &self,
        student_id: i64,
        req: CreateAcademicRecordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(records::add_academic_record(self, student_id, req, request).await)
    }

    pub async fn list_academic_records(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(records::list_academic_records(self, student_id, request).await)
    }

    // 班级花名册及本月出勤统计
    pub async fn students_by_class(
        &self,
        query: ClassRosterQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::students_by_class(self, query, request).await)
    }
}
