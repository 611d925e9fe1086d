use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 报表模板表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ReportTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportTemplates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportTemplates::Name).string().not_null())
                    .col(
                        ColumnDef::new(ReportTemplates::ReportType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportTemplates::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportTemplates::Parameters)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportTemplates::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportTemplates::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReportTemplates::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportTemplates::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReportTemplates::Table, ReportTemplates::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 已生成报表表 ====================
        manager
            .create_table(
                Table::create()
                    .table(GeneratedReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedReports::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::TemplateId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::ReportType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::ReportName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::Parameters)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::StartDate)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(GeneratedReports::EndDate).string().null())
                    .col(ColumnDef::new(GeneratedReports::Data).text().not_null())
                    .col(ColumnDef::new(GeneratedReports::Summary).text().not_null())
                    .col(
                        ColumnDef::new(GeneratedReports::FileFormat)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::GeneratedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::GeneratedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::IsReady)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedReports::IsArchived)
                            .boolean()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GeneratedReports::Table, GeneratedReports::TemplateId)
                            .to(ReportTemplates::Table, ReportTemplates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GeneratedReports::Table, GeneratedReports::GeneratedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 仪表盘组件表 ====================
        manager
            .create_table(
                Table::create()
                    .table(DashboardWidgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DashboardWidgets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DashboardWidgets::Name).string().not_null())
                    .col(
                        ColumnDef::new(DashboardWidgets::WidgetType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::ChartType)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::Configuration)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::RefreshInterval)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DashboardWidgets::Width).integer().not_null())
                    .col(
                        ColumnDef::new(DashboardWidgets::Height)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::DisplayOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::UserTypes)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DashboardWidgets::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 报表计划表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ReportSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportSchedules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportSchedules::Name).string().not_null())
                    .col(
                        ColumnDef::new(ReportSchedules::TemplateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::Frequency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::DayOfWeek)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::DayOfMonth)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(ReportSchedules::Hour).integer().not_null())
                    .col(ColumnDef::new(ReportSchedules::Minute).integer().not_null())
                    .col(
                        ColumnDef::new(ReportSchedules::EmailRecipients)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::NotifyUsers)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::OutputFormats)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::LastRun)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::NextRun)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportSchedules::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReportSchedules::Table, ReportSchedules::TemplateId)
                            .to(ReportTemplates::Table, ReportTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReportSchedules::Table, ReportSchedules::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_generated_reports_generated_by")
                    .table(GeneratedReports::Table)
                    .col(GeneratedReports::GeneratedBy)
                    .to_owned(),
            )
            .await?;

        // ==================== 插入默认仪表盘组件 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        let staff = r#"["admin","instructor","registrar","hod"]"#;
        let everyone = r#"["admin","instructor","student","registrar","hod"]"#;

        let default_widgets = [
            (
                "Weekly Attendance",
                "attendance_chart",
                Some("line"),
                "Attendance rate for the last 7 days",
                12,
                staff,
                1,
            ),
            (
                "Student Statistics",
                "student_stats",
                None,
                "Student totals by status and gender",
                4,
                staff,
                2,
            ),
            (
                "Class Statistics",
                "class_stats",
                None,
                "Active classes and today's attendance rate",
                4,
                staff,
                3,
            ),
            (
                "Instructor Statistics",
                "instructor_stats",
                None,
                "Instructor totals",
                4,
                r#"["admin","registrar","hod"]"#,
                4,
            ),
            (
                "Recent Activity",
                "recent_activity",
                None,
                "Most recent attendance sessions",
                6,
                everyone,
                5,
            ),
        ];

        for (name, widget_type, chart_type, description, width, user_types, order) in
            default_widgets
        {
            let insert = Query::insert()
                .into_table(DashboardWidgets::Table)
                .columns([
                    DashboardWidgets::Name,
                    DashboardWidgets::WidgetType,
                    DashboardWidgets::ChartType,
                    DashboardWidgets::Description,
                    DashboardWidgets::Configuration,
                    DashboardWidgets::RefreshInterval,
                    DashboardWidgets::Width,
                    DashboardWidgets::Height,
                    DashboardWidgets::IsActive,
                    DashboardWidgets::DisplayOrder,
                    DashboardWidgets::UserTypes,
                    DashboardWidgets::CreatedAt,
                    DashboardWidgets::UpdatedAt,
                ])
                .values_panic([
                    name.into(),
                    widget_type.into(),
                    chart_type.into(),
                    description.into(),
                    "{}".into(),
                    300.into(),
                    width.into(),
                    300.into(),
                    true.into(),
                    order.into(),
                    user_types.into(),
                    now.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DashboardWidgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GeneratedReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReportTemplates::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ReportTemplates {
    #[sea_orm(iden = "report_templates")]
    Table,
    Id,
    Name,
    ReportType,
    Description,
    Parameters,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GeneratedReports {
    #[sea_orm(iden = "generated_reports")]
    Table,
    Id,
    TemplateId,
    ReportType,
    ReportName,
    Description,
    Parameters,
    StartDate,
    EndDate,
    Data,
    Summary,
    FileFormat,
    FileSize,
    GeneratedBy,
    GeneratedAt,
    IsReady,
    IsArchived,
}

#[derive(DeriveIden)]
enum DashboardWidgets {
    #[sea_orm(iden = "dashboard_widgets")]
    Table,
    Id,
    Name,
    WidgetType,
    ChartType,
    Description,
    Configuration,
    RefreshInterval,
    Width,
    Height,
    IsActive,
    DisplayOrder,
    UserTypes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ReportSchedules {
    #[sea_orm(iden = "report_schedules")]
    Table,
    Id,
    Name,
    TemplateId,
    Frequency,
    DayOfWeek,
    DayOfMonth,
    Hour,
    Minute,
    EmailRecipients,
    NotifyUsers,
    OutputFormats,
    IsActive,
    LastRun,
    NextRun,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
