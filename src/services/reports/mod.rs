pub mod attendance;
pub mod chart;
pub mod classes;
pub mod dashboard;
pub mod export;
pub mod next_run;
pub mod period;
pub mod quick;
pub mod saved;
pub mod schedules;
pub mod students;
pub mod templates;
pub mod widgets;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::models::reports::requests::{
    AttendanceReportParams, ClassReportParams, CreateScheduleRequest, CreateTemplateRequest,
    CreateWidgetRequest, ExportReportParams, QuickReportParams, SaveReportRequest,
    SavedReportQueryParams, StudentReportParams, UpdateScheduleRequest, UpdateTemplateRequest,
    UpdateWidgetRequest,
};

lazy_service!(ReportService);

impl ReportService {
    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(dashboard::reports_dashboard(self, request).await)
    }

    pub async fn attendance_report(
        &self,
        params: AttendanceReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(attendance::attendance_report(self, params, request).await)
    }

    pub async fn student_report(
        &self,
        params: StudentReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(students::student_report(self, params, request).await)
    }

    pub async fn class_report(
        &self,
        params: ClassReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(classes::class_report(self, params, request).await)
    }

    // 导出为 CSV 或 Excel 附件
    pub async fn export_report(
        &self,
        kind: String,
        params: ExportReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(export::export_report(self, kind, params, request).await)
    }

    pub async fn quick_report(
        &self,
        params: QuickReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(quick::quick_report(self, params, request).await)
    }

    pub async fn widget_data(&self, widget_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(widgets::widget_data(self, widget_id, request).await)
    }

    pub async fn list_widgets(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(widgets::list_widgets(self, request).await)
    }

    pub async fn create_widget(
        &self,
        req: CreateWidgetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(widgets::create_widget(self, req, request).await)
    }

    pub async fn update_widget(
        &self,
        widget_id: i64,
        update: UpdateWidgetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(widgets::update_widget(self, widget_id, update, request).await)
    }

    pub async fn delete_widget(&self, widget_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(widgets::delete_widget(self, widget_id, request).await)
    }

    pub async fn save_report(
        &self,
        req: SaveReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(saved::save_report(self, req, request).await)
    }

    pub async fn list_saved_reports(
        &self,
        params: SavedReportQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(saved::list_saved_reports(self, params, request).await)
    }

    pub async fn get_saved_report(&self, report_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(saved::get_saved_report(self, report_id, request).await)
    }

    pub async fn archive_report(&self, report_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(saved::archive_report(self, report_id, request).await)
    }

    pub async fn delete_report(&self, report_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(saved::delete_report(self, report_id, request).await)
    }

    pub async fn list_templates(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(templates::list_templates(self, request).await)
    }

    pub async fn get_template(&self, template_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(templates::get_template(self, template_id, request).await)
    }

    pub async fn create_template(
        &self,
        req: CreateTemplateRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(templates::create_template(self, req, request).await)
    }

    pub async fn update_template(
        &self,
        template_id: i64,
        update: UpdateTemplateRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(templates::update_template(self, template_id, update, request).await)
    }

    pub async fn delete_template(&self, template_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(templates::delete_template(self, template_id, request).await)
    }

    pub async fn list_schedules(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(schedules::list_schedules(self, request).await)
    }

    pub async fn get_schedule(&self, schedule_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(schedules::get_schedule(self, schedule_id, request).await)
    }

    pub async fn create_schedule(
        &self,
        req: CreateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(schedules::create_schedule(self, req, request).await)
    }

    pub async fn update_schedule(
        &self,
        schedule_id: i64,
        update: UpdateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(schedules::update_schedule(self, schedule_id, update, request).await)
    }

    pub async fn delete_schedule(&self, schedule_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(schedules::delete_schedule(self, schedule_id, request).await)
    }
}
