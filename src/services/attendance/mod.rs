pub mod dashboard;
pub mod history;
pub mod marking;
pub mod qr;
pub mod report;
pub mod rules;
pub mod sessions;
pub mod summaries;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::models::attendance::{
    entities::SessionStatus,
    requests::{
        AttendanceFilterParams, BulkMarkRequest, CreateSessionRequest, GenerateSummaryRequest,
        HistoryQueryParams, MarkAttendanceRequest, QrCheckInRequest, SessionQueryParams,
        SummaryQueryParams, UpdateRecordStatusRequest,
    },
};

lazy_service!(AttendanceService);

impl AttendanceService {
    // 创建课次并为在读学生预置缺勤记录
    pub async fn create_session(
        &self,
        req: CreateSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(sessions::create_session(self, req, request).await)
    }

    pub async fn list_sessions(
        &self,
        query: SessionQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(sessions::list_sessions(self, query, request).await)
    }

    pub async fn get_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(sessions::get_session(self, session_id, request).await)
    }

    pub async fn start_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(sessions::transition_session(self, session_id, SessionStatus::Ongoing, request).await)
    }

    pub async fn close_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(
            sessions::transition_session(self, session_id, SessionStatus::Completed, request).await,
        )
    }

    pub async fn cancel_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(
            sessions::transition_session(self, session_id, SessionStatus::Cancelled, request).await,
        )
    }

    pub async fn mark_attendance(
        &self,
        session_id: i64,
        req: MarkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(marking::mark_attendance(self, session_id, req, request).await)
    }

    pub async fn bulk_mark_attendance(
        &self,
        session_id: i64,
        req: BulkMarkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(marking::bulk_mark_attendance(self, session_id, req, request).await)
    }

    pub async fn update_record_status(
        &self,
        record_id: i64,
        req: UpdateRecordStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(marking::update_record_status(self, record_id, req, request).await)
    }

    pub async fn view_qr(&self, session_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(qr::view_qr(self, session_id, request).await)
    }

    pub async fn regenerate_qr(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(qr::regenerate_qr(self, session_id, request).await)
    }

    // 扫码签到
    pub async fn qr_check_in(
        &self,
        session_id: i64,
        req: QrCheckInRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(qr::qr_check_in(self, session_id, req, request).await)
    }

    pub async fn student_history(
        &self,
        query: HistoryQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(history::student_history(self, query, request).await)
    }

    pub async fn filter_report(
        &self,
        params: AttendanceFilterParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(report::filter_report(self, params, request).await)
    }

    pub async fn export_csv(
        &self,
        params: AttendanceFilterParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(report::export_csv(self, params, request).await)
    }

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(dashboard::attendance_dashboard(self, request).await)
    }

    pub async fn generate_summary(
        &self,
        req: GenerateSummaryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(summaries::generate_summary(self, req, request).await)
    }

    pub async fn list_summaries(
        &self,
        query: SummaryQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(summaries::list_summaries(self, query, request).await)
    }
}
