use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::reports::requests::{
    AttendanceReportParams, ClassReportParams, CreateScheduleRequest, CreateTemplateRequest,
    CreateWidgetRequest, ExportReportParams, QuickReportParams, SaveReportRequest,
    SavedReportQueryParams, StudentReportParams, UpdateScheduleRequest, UpdateTemplateRequest,
    UpdateWidgetRequest,
};
use crate::models::users::entities::UserType;
use crate::services::ReportService;
use crate::utils::{SafeIDI64, SafeWidgetIdI64};

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.dashboard(&req).await
}

pub async fn attendance_report(
    req: HttpRequest,
    query: web::Query<AttendanceReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.attendance_report(query.into_inner(), &req).await
}

pub async fn student_report(
    req: HttpRequest,
    query: web::Query<StudentReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.student_report(query.into_inner(), &req).await
}

pub async fn class_report(
    req: HttpRequest,
    query: web::Query<ClassReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.class_report(query.into_inner(), &req).await
}

pub async fn export_report(
    req: HttpRequest,
    kind: web::Path<String>,
    query: web::Query<ExportReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .export_report(kind.into_inner(), query.into_inner(), &req)
        .await
}

pub async fn quick_report(
    req: HttpRequest,
    query: web::Query<QuickReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.quick_report(query.into_inner(), &req).await
}

pub async fn list_widgets(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_widgets(&req).await
}

pub async fn create_widget(
    req: HttpRequest,
    body: web::Json<CreateWidgetRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.create_widget(body.into_inner(), &req).await
}

pub async fn widget_data(req: HttpRequest, id: SafeWidgetIdI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.widget_data(id.0, &req).await
}

pub async fn update_widget(
    req: HttpRequest,
    id: SafeWidgetIdI64,
    body: web::Json<UpdateWidgetRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.update_widget(id.0, body.into_inner(), &req).await
}

pub async fn delete_widget(req: HttpRequest, id: SafeWidgetIdI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.delete_widget(id.0, &req).await
}

pub async fn list_saved_reports(
    req: HttpRequest,
    query: web::Query<SavedReportQueryParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_saved_reports(query.into_inner(), &req).await
}

pub async fn save_report(
    req: HttpRequest,
    body: web::Json<SaveReportRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.save_report(body.into_inner(), &req).await
}

pub async fn get_saved_report(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_saved_report(id.0, &req).await
}

pub async fn archive_report(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.archive_report(id.0, &req).await
}

pub async fn delete_report(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.delete_report(id.0, &req).await
}

pub async fn list_templates(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_templates(&req).await
}

pub async fn create_template(
    req: HttpRequest,
    body: web::Json<CreateTemplateRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.create_template(body.into_inner(), &req).await
}

pub async fn get_template(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_template(id.0, &req).await
}

pub async fn update_template(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateTemplateRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.update_template(id.0, body.into_inner(), &req).await
}

pub async fn delete_template(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.delete_template(id.0, &req).await
}

pub async fn list_schedules(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_schedules(&req).await
}

pub async fn create_schedule(
    req: HttpRequest,
    body: web::Json<CreateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.create_schedule(body.into_inner(), &req).await
}

pub async fn get_schedule(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_schedule(id.0, &req).await
}

pub async fn update_schedule(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.update_schedule(id.0, body.into_inner(), &req).await
}

pub async fn delete_schedule(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.delete_schedule(id.0, &req).await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    let staff = || RequireRole::new_any(UserType::staff_roles());
    let management = || RequireRole::new_any(UserType::management_roles());
    let admin = || RequireRole::new_any(UserType::admin_roles());

    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            // 首页与组件数据按组件的可见角色过滤
            .route("/dashboard", web::get().to(dashboard))
            .route("/widgets/{widget_id}/data", web::get().to(widget_data))
            .service(
                web::resource("/widgets")
                    .route(web::get().to(list_widgets))
                    .route(web::post().to(create_widget).wrap(admin())),
            )
            .service(
                web::resource("/widgets/{widget_id}")
                    .wrap(admin())
                    .route(web::put().to(update_widget))
                    .route(web::delete().to(delete_widget)),
            )
            .service(
                web::resource("/templates")
                    .route(web::get().to(list_templates).wrap(staff()))
                    .route(web::post().to(create_template).wrap(management())),
            )
            .service(
                web::resource("/templates/{id}")
                    .route(web::get().to(get_template).wrap(staff()))
                    .route(web::put().to(update_template).wrap(management()))
                    .route(web::delete().to(delete_template).wrap(management())),
            )
            .service(
                web::scope("/schedules")
                    .wrap(management())
                    .service(
                        web::resource("")
                            .route(web::get().to(list_schedules))
                            .route(web::post().to(create_schedule)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(get_schedule))
                            .route(web::put().to(update_schedule))
                            .route(web::delete().to(delete_schedule)),
                    ),
            )
            .service(
                web::scope("")
                    .wrap(staff())
                    .route("/attendance", web::get().to(attendance_report))
                    .route("/students", web::get().to(student_report))
                    .route("/classes", web::get().to(class_report))
                    .route("/export/{kind}", web::get().to(export_report))
                    .route("/quick", web::get().to(quick_report))
                    .service(
                        web::resource("/saved")
                            .route(web::get().to(list_saved_reports))
                            .route(web::post().to(save_report)),
                    )
                    .service(
                        web::resource("/saved/{id}")
                            .route(web::get().to(get_saved_report))
                            .route(web::delete().to(delete_report)),
                    )
                    .route("/saved/{id}/archive", web::post().to(archive_report)),
            ),
    );
}
