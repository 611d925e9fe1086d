use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::attendance::requests::{
    AttendanceFilterParams, BulkMarkRequest, CreateSessionRequest, GenerateSummaryRequest,
    HistoryQueryParams, MarkAttendanceRequest, QrCheckInRequest, SessionQueryParams,
    SummaryQueryParams, UpdateRecordStatusRequest,
};
use crate::models::users::entities::UserType;
use crate::services::AttendanceService;
use crate::utils::{SafeRecordIdI64, SafeSessionIdI64};

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.dashboard(&req).await
}

pub async fn list_sessions(
    req: HttpRequest,
    query: web::Query<SessionQueryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_sessions(query.into_inner(), &req).await
}

pub async fn create_session(
    req: HttpRequest,
    body: web::Json<CreateSessionRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.create_session(body.into_inner(), &req).await
}

pub async fn get_session(req: HttpRequest, id: SafeSessionIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_session(id.0, &req).await
}

pub async fn start_session(req: HttpRequest, id: SafeSessionIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.start_session(id.0, &req).await
}

pub async fn close_session(req: HttpRequest, id: SafeSessionIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.close_session(id.0, &req).await
}

pub async fn cancel_session(req: HttpRequest, id: SafeSessionIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.cancel_session(id.0, &req).await
}

pub async fn mark_attendance(
    req: HttpRequest,
    id: SafeSessionIdI64,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.mark_attendance(id.0, body.into_inner(), &req).await
}

pub async fn bulk_mark_attendance(
    req: HttpRequest,
    id: SafeSessionIdI64,
    body: web::Json<BulkMarkRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.bulk_mark_attendance(id.0, body.into_inner(), &req).await
}

pub async fn view_qr(req: HttpRequest, id: SafeSessionIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.view_qr(id.0, &req).await
}

pub async fn regenerate_qr(req: HttpRequest, id: SafeSessionIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.regenerate_qr(id.0, &req).await
}

pub async fn qr_check_in(
    req: HttpRequest,
    id: SafeSessionIdI64,
    body: web::Json<QrCheckInRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.qr_check_in(id.0, body.into_inner(), &req).await
}

pub async fn update_record_status(
    req: HttpRequest,
    id: SafeRecordIdI64,
    body: web::Json<UpdateRecordStatusRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.update_record_status(id.0, body.into_inner(), &req).await
}

pub async fn student_history(
    req: HttpRequest,
    query: web::Query<HistoryQueryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.student_history(query.into_inner(), &req).await
}

pub async fn filter_report(
    req: HttpRequest,
    query: web::Query<AttendanceFilterParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.filter_report(query.into_inner(), &req).await
}

pub async fn export_csv(
    req: HttpRequest,
    query: web::Query<AttendanceFilterParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.export_csv(query.into_inner(), &req).await
}

pub async fn generate_summary(
    req: HttpRequest,
    body: web::Json<GenerateSummaryRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.generate_summary(body.into_inner(), &req).await
}

pub async fn list_summaries(
    req: HttpRequest,
    query: web::Query<SummaryQueryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_summaries(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    let instructors = || RequireRole::new_any(UserType::instructor_roles());
    let staff = || RequireRole::new_any(UserType::staff_roles());

    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .route("/dashboard", web::get().to(dashboard))
            .route("/history", web::get().to(student_history))
            .service(
                web::resource("/sessions")
                    .route(web::get().to(list_sessions))
                    .route(web::post().to(create_session).wrap(instructors())),
            )
            .route("/sessions/{session_id}", web::get().to(get_session))
            .service(
                web::scope("/sessions/{session_id}")
                    .service(
                        // 扫码签到单独限流
                        web::resource("/check-in")
                            .wrap(RateLimit::qr_check_in())
                            .route(web::post().to(qr_check_in)),
                    )
                    .service(
                        web::scope("")
                            .wrap(instructors())
                            .route("/start", web::post().to(start_session))
                            .route("/close", web::post().to(close_session))
                            .route("/cancel", web::post().to(cancel_session))
                            .route("/mark", web::post().to(mark_attendance))
                            .route("/bulk-mark", web::post().to(bulk_mark_attendance))
                            .route("/qr", web::get().to(view_qr))
                            .route("/qr/regenerate", web::post().to(regenerate_qr)),
                    ),
            )
            .service(
                web::resource("/records/{record_id}/status")
                    .route(web::put().to(update_record_status).wrap(instructors())),
            )
            .service(
                web::resource("/report").route(web::get().to(filter_report).wrap(staff())),
            )
            .service(
                web::resource("/export").route(web::get().to(export_csv).wrap(staff())),
            )
            .service(
                web::resource("/summaries")
                    .route(web::get().to(list_summaries))
                    .route(web::post().to(generate_summary).wrap(staff())),
            ),
    );
}
