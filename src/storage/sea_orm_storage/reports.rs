use super::SeaOrmStorage;
use crate::entity::dashboard_widgets::{
    ActiveModel as WidgetActiveModel, Column as WidgetColumn, Entity as DashboardWidgets,
};
use crate::entity::generated_reports::{
    ActiveModel as ReportActiveModel, Column as ReportColumn, Entity as GeneratedReports,
};
use crate::entity::report_schedules::{
    ActiveModel as ScheduleActiveModel, Column as ScheduleColumn, Entity as ReportSchedules,
};
use crate::entity::report_templates::{
    ActiveModel as TemplateActiveModel, Column as TemplateColumn, Entity as ReportTemplates,
};
use crate::errors::{AttendanceError, Result};
use crate::models::{
    PaginationInfo,
    reports::{
        entities::{DashboardWidget, FileFormat, GeneratedReport, ReportSchedule, ReportTemplate},
        requests::{
            CreateScheduleRequest, CreateTemplateRequest, CreateWidgetRequest, SaveReportRequest,
            SavedReportListQuery, UpdateScheduleRequest, UpdateTemplateRequest,
            UpdateWidgetRequest,
        },
        responses::SavedReportListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;

// JSON 列统一以文本形式存储
fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

impl SeaOrmStorage {
    // 报表模板

    pub async fn create_report_template_impl(
        &self,
        req: CreateTemplateRequest,
        created_by: i64,
    ) -> Result<ReportTemplate> {
        let now = chrono::Utc::now().timestamp();

        let model = TemplateActiveModel {
            name: Set(req.name.trim().to_string()),
            report_type: Set(req.report_type.to_string()),
            description: Set(req.description),
            parameters: Set(to_json_text(&req.parameters)?),
            is_active: Set(req.is_active),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建报表模板失败: {e}")))?;

        Ok(result.into_template())
    }

    pub async fn get_report_template_impl(&self, id: i64) -> Result<Option<ReportTemplate>> {
        let result = ReportTemplates::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询报表模板失败: {e}")))?;

        Ok(result.map(|m| m.into_template()))
    }

    pub async fn list_report_templates_impl(&self, active_only: bool) -> Result<Vec<ReportTemplate>> {
        let mut select = ReportTemplates::find();
        if active_only {
            select = select.filter(TemplateColumn::IsActive.eq(true));
        }

        let templates = select
            .order_by_asc(TemplateColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询报表模板失败: {e}")))?;

        Ok(templates.into_iter().map(|m| m.into_template()).collect())
    }

    pub async fn update_report_template_impl(
        &self,
        id: i64,
        update: UpdateTemplateRequest,
    ) -> Result<Option<ReportTemplate>> {
        if self.get_report_template_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = TemplateActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(report_type) = update.report_type {
            model.report_type = Set(report_type.to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(ref parameters) = update.parameters {
            model.parameters = Set(to_json_text(parameters)?);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新报表模板失败: {e}")))?;

        self.get_report_template_impl(id).await
    }

    pub async fn delete_report_template_impl(&self, id: i64) -> Result<bool> {
        let result = ReportTemplates::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("删除报表模板失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // 已保存报表

    /// 报表数据随记录一起保存，大小按序列化后的字节数计
    pub async fn save_generated_report_impl(
        &self,
        req: SaveReportRequest,
        generated_by: i64,
    ) -> Result<GeneratedReport> {
        let data = to_json_text(&req.data)?;
        let file_size = data.len() as i64;

        let model = ReportActiveModel {
            template_id: Set(req.template_id),
            report_type: Set(req.report_type.to_string()),
            report_name: Set(req.report_name.trim().to_string()),
            description: Set(req.description),
            parameters: Set(to_json_text(&req.parameters)?),
            start_date: Set(req.start_date.map(|d| d.to_string())),
            end_date: Set(req.end_date.map(|d| d.to_string())),
            data: Set(data),
            summary: Set(to_json_text(&req.summary)?),
            file_format: Set(req.file_format.unwrap_or(FileFormat::Html).to_string()),
            file_size: Set(file_size),
            generated_by: Set(Some(generated_by)),
            generated_at: Set(chrono::Utc::now().timestamp()),
            is_ready: Set(true),
            is_archived: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("保存报表失败: {e}")))?;

        Ok(result.into_report())
    }

    pub async fn get_generated_report_impl(&self, id: i64) -> Result<Option<GeneratedReport>> {
        let result = GeneratedReports::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询报表失败: {e}")))?;

        Ok(result.map(|m| m.into_report()))
    }

    pub async fn list_generated_reports_impl(
        &self,
        query: SavedReportListQuery,
    ) -> Result<SavedReportListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = GeneratedReports::find();
        if let Some(generated_by) = query.generated_by {
            select = select.filter(ReportColumn::GeneratedBy.eq(generated_by));
        }
        if !query.include_archived {
            select = select.filter(ReportColumn::IsArchived.eq(false));
        }

        let paginator = select
            .order_by_desc(ReportColumn::GeneratedAt)
            .order_by_desc(ReportColumn::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询报表总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询报表页数失败: {e}")))?;
        let reports = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询报表列表失败: {e}")))?;

        Ok(SavedReportListResponse {
            items: reports.into_iter().map(|m| m.into_report()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn list_recent_reports_impl(
        &self,
        generated_by: i64,
        limit: u64,
    ) -> Result<Vec<GeneratedReport>> {
        let reports = GeneratedReports::find()
            .filter(ReportColumn::GeneratedBy.eq(generated_by))
            .filter(ReportColumn::IsArchived.eq(false))
            .order_by_desc(ReportColumn::GeneratedAt)
            .order_by_desc(ReportColumn::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询最近报表失败: {e}")))?;

        Ok(reports.into_iter().map(|m| m.into_report()).collect())
    }

    pub async fn archive_generated_report_impl(&self, id: i64) -> Result<Option<GeneratedReport>> {
        if self.get_generated_report_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ReportActiveModel {
            id: Set(id),
            is_archived: Set(true),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("归档报表失败: {e}")))?;

        self.get_generated_report_impl(id).await
    }

    pub async fn delete_generated_report_impl(&self, id: i64) -> Result<bool> {
        let result = GeneratedReports::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("删除报表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // 首页组件

    pub async fn create_widget_impl(&self, req: CreateWidgetRequest) -> Result<DashboardWidget> {
        let now = chrono::Utc::now().timestamp();

        let model = WidgetActiveModel {
            name: Set(req.name.trim().to_string()),
            widget_type: Set(req.widget_type.to_string()),
            chart_type: Set(req.chart_type.map(|c| c.to_string())),
            description: Set(req.description),
            configuration: Set(to_json_text(&req.configuration)?),
            refresh_interval: Set(req.refresh_interval),
            width: Set(req.width),
            height: Set(req.height),
            is_active: Set(req.is_active),
            display_order: Set(req.display_order),
            user_types: Set(to_json_text(&req.user_types)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建首页组件失败: {e}")))?;

        Ok(result.into_widget())
    }

    pub async fn get_widget_impl(&self, id: i64) -> Result<Option<DashboardWidget>> {
        let result = DashboardWidgets::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询首页组件失败: {e}")))?;

        Ok(result.map(|m| m.into_widget()))
    }

    pub async fn list_widgets_impl(&self, active_only: bool) -> Result<Vec<DashboardWidget>> {
        let mut select = DashboardWidgets::find();
        if active_only {
            select = select.filter(WidgetColumn::IsActive.eq(true));
        }

        let widgets = select
            .order_by_asc(WidgetColumn::DisplayOrder)
            .order_by_asc(WidgetColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询首页组件失败: {e}")))?;

        Ok(widgets.into_iter().map(|m| m.into_widget()).collect())
    }

    pub async fn update_widget_impl(
        &self,
        id: i64,
        update: UpdateWidgetRequest,
    ) -> Result<Option<DashboardWidget>> {
        if self.get_widget_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = WidgetActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(widget_type) = update.widget_type {
            model.widget_type = Set(widget_type.to_string());
        }
        if let Some(chart_type) = update.chart_type {
            model.chart_type = Set(Some(chart_type.to_string()));
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(ref configuration) = update.configuration {
            model.configuration = Set(to_json_text(configuration)?);
        }
        if let Some(interval) = update.refresh_interval {
            model.refresh_interval = Set(interval);
        }
        if let Some(width) = update.width {
            model.width = Set(width);
        }
        if let Some(height) = update.height {
            model.height = Set(height);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(order) = update.display_order {
            model.display_order = Set(order);
        }
        if let Some(ref user_types) = update.user_types {
            model.user_types = Set(to_json_text(user_types)?);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新首页组件失败: {e}")))?;

        self.get_widget_impl(id).await
    }

    pub async fn delete_widget_impl(&self, id: i64) -> Result<bool> {
        let result = DashboardWidgets::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("删除首页组件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // 定时报表

    pub async fn create_schedule_impl(
        &self,
        req: CreateScheduleRequest,
        created_by: i64,
        next_run: Option<i64>,
    ) -> Result<ReportSchedule> {
        let now = chrono::Utc::now().timestamp();

        let model = ScheduleActiveModel {
            name: Set(req.name.trim().to_string()),
            template_id: Set(req.template_id),
            frequency: Set(req.frequency.to_string()),
            day_of_week: Set(req.day_of_week),
            day_of_month: Set(req.day_of_month),
            hour: Set(req.hour),
            minute: Set(req.minute),
            email_recipients: Set(to_json_text(&req.email_recipients)?),
            notify_users: Set(to_json_text(&req.notify_users)?),
            output_formats: Set(to_json_text(&req.output_formats)?),
            is_active: Set(req.is_active),
            last_run: Set(None),
            next_run: Set(next_run),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建定时报表失败: {e}")))?;

        Ok(result.into_schedule())
    }

    pub async fn get_schedule_impl(&self, id: i64) -> Result<Option<ReportSchedule>> {
        let result = ReportSchedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询定时报表失败: {e}")))?;

        Ok(result.map(|m| m.into_schedule()))
    }

    pub async fn list_schedules_impl(&self) -> Result<Vec<ReportSchedule>> {
        let schedules = ReportSchedules::find()
            .order_by_asc(ScheduleColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询定时报表失败: {e}")))?;

        Ok(schedules.into_iter().map(|m| m.into_schedule()).collect())
    }

    /// next_run 由调用方按合并后的定时参数重新计算
    pub async fn update_schedule_impl(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
        next_run: Option<i64>,
    ) -> Result<Option<ReportSchedule>> {
        if self.get_schedule_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ScheduleActiveModel {
            id: Set(id),
            next_run: Set(next_run),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(template_id) = update.template_id {
            model.template_id = Set(template_id);
        }
        if let Some(frequency) = update.frequency {
            model.frequency = Set(frequency.to_string());
        }
        if let Some(day) = update.day_of_week {
            model.day_of_week = Set(Some(day));
        }
        if let Some(day) = update.day_of_month {
            model.day_of_month = Set(Some(day));
        }
        if let Some(hour) = update.hour {
            model.hour = Set(hour);
        }
        if let Some(minute) = update.minute {
            model.minute = Set(minute);
        }
        if let Some(ref recipients) = update.email_recipients {
            model.email_recipients = Set(to_json_text(recipients)?);
        }
        if let Some(ref users) = update.notify_users {
            model.notify_users = Set(to_json_text(users)?);
        }
        if let Some(ref formats) = update.output_formats {
            model.output_formats = Set(to_json_text(formats)?);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新定时报表失败: {e}")))?;

        self.get_schedule_impl(id).await
    }

    pub async fn delete_schedule_impl(&self, id: i64) -> Result<bool> {
        let result = ReportSchedules::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("删除定时报表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{new_user, storage};
    use crate::models::reports::entities::{
        FileFormat, ReportType, ScheduleFrequency, WidgetType,
    };
    use crate::models::reports::requests::{
        CreateScheduleRequest, CreateTemplateRequest, CreateWidgetRequest, SaveReportRequest,
        SavedReportListQuery, UpdateScheduleRequest, UpdateTemplateRequest, UpdateWidgetRequest,
    };
    use crate::models::users::entities::{AccountStatus, UserType};
    use serde_json::json;

    fn widget(name: &str, display_order: i32) -> CreateWidgetRequest {
        CreateWidgetRequest {
            name: name.to_string(),
            widget_type: WidgetType::StudentStats,
            chart_type: None,
            description: String::new(),
            configuration: json!({}),
            refresh_interval: 300,
            width: 4,
            height: 300,
            is_active: true,
            display_order,
            user_types: vec!["admin".to_string(), "registrar".to_string()],
        }
    }

    #[tokio::test]
    async fn test_template_crud() {
        let storage = storage().await;
        let admin = storage
            .create_user_impl(new_user("sysadmin", UserType::Admin, AccountStatus::Approved))
            .await
            .unwrap();

        let template = storage
            .create_report_template_impl(
                CreateTemplateRequest {
                    name: " Weekly Summary ".to_string(),
                    report_type: ReportType::AttendanceSummary,
                    description: String::new(),
                    parameters: json!({"group_by": "week"}),
                    is_active: true,
                },
                admin.id,
            )
            .await
            .unwrap();
        assert_eq!(template.name, "Weekly Summary");
        assert_eq!(template.parameters["group_by"], "week");

        let updated = storage
            .update_report_template_impl(
                template.id,
                UpdateTemplateRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.is_active);
        assert!(storage.list_report_templates_impl(true).await.unwrap().is_empty());
        assert_eq!(storage.list_report_templates_impl(false).await.unwrap().len(), 1);

        assert!(storage.delete_report_template_impl(template.id).await.unwrap());
        assert!(storage.get_report_template_impl(template.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_saved_report_archive_hides_from_default_listing() {
        let storage = storage().await;
        let user = storage
            .create_user_impl(new_user("registrar1", UserType::Registrar, AccountStatus::Approved))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for name in ["March attendance", "April attendance"] {
            let report = storage
                .save_generated_report_impl(
                    SaveReportRequest {
                        report_name: name.to_string(),
                        report_type: ReportType::MonthlySummary,
                        template_id: None,
                        description: String::new(),
                        parameters: json!({}),
                        data: json!([{"label": "Week 1", "rate": 92.5}]),
                        summary: json!({"total_sessions": 4}),
                        start_date: None,
                        end_date: None,
                        file_format: Some(FileFormat::Csv),
                    },
                    user.id,
                )
                .await
                .unwrap();
            assert!(report.is_ready);
            assert!(report.file_size > 0);
            ids.push(report.id);
        }

        let archived = storage
            .archive_generated_report_impl(ids[0])
            .await
            .unwrap()
            .unwrap();
        assert!(archived.is_archived);

        let visible = storage
            .list_generated_reports_impl(SavedReportListQuery {
                generated_by: Some(user.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(visible.pagination.total, 1);
        assert_eq!(visible.items[0].report_name, "April attendance");

        let all = storage
            .list_generated_reports_impl(SavedReportListQuery {
                generated_by: Some(user.id),
                include_archived: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let recent = storage.list_recent_reports_impl(user.id, 5).await.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn test_widgets_follow_display_order() {
        let storage = storage().await;
        storage.create_widget_impl(widget("Recent Activity", 2)).await.unwrap();
        let first = storage.create_widget_impl(widget("Student Statistics", 1)).await.unwrap();
        assert_eq!(first.user_types, vec!["admin", "registrar"]);

        let names: Vec<String> = storage
            .list_widgets_impl(true)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();
        assert_eq!(names, vec!["Student Statistics", "Recent Activity"]);

        storage
            .update_widget_impl(
                first.id,
                UpdateWidgetRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(storage.list_widgets_impl(true).await.unwrap().len(), 1);
        assert_eq!(storage.list_widgets_impl(false).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_schedule_create_and_update() {
        let storage = storage().await;
        let admin = storage
            .create_user_impl(new_user("hodict", UserType::Hod, AccountStatus::Approved))
            .await
            .unwrap();
        let template = storage
            .create_report_template_impl(
                CreateTemplateRequest {
                    name: "Monthly".to_string(),
                    report_type: ReportType::MonthlySummary,
                    description: String::new(),
                    parameters: json!({}),
                    is_active: true,
                },
                admin.id,
            )
            .await
            .unwrap();

        let schedule = storage
            .create_schedule_impl(
                CreateScheduleRequest {
                    name: "Weekly digest".to_string(),
                    template_id: template.id,
                    frequency: ScheduleFrequency::Weekly,
                    day_of_week: Some(0),
                    day_of_month: None,
                    hour: 9,
                    minute: 30,
                    email_recipients: vec!["hod@kitui-tvet.ac.ke".to_string()],
                    notify_users: vec![admin.id],
                    output_formats: vec![FileFormat::Excel],
                    is_active: true,
                },
                admin.id,
                Some(1_760_000_000),
            )
            .await
            .unwrap();
        assert_eq!(schedule.frequency, ScheduleFrequency::Weekly);
        assert_eq!(schedule.output_formats, vec![FileFormat::Excel]);
        assert_eq!(schedule.next_run.map(|t| t.timestamp()), Some(1_760_000_000));

        let updated = storage
            .update_schedule_impl(
                schedule.id,
                UpdateScheduleRequest {
                    hour: Some(7),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.hour, 7);
        assert_eq!(updated.minute, 30);
        assert!(updated.next_run.is_none());
        assert_eq!(storage.list_schedules_impl().await.unwrap().len(), 1);
    }
}
