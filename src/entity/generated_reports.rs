//! 已保存报表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "generated_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub template_id: Option<i64>,
    pub report_type: String,
    pub report_name: String,
    pub description: String,
    pub parameters: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub data: String,
    pub summary: String,
    pub file_format: String,
    pub file_size: i64,
    pub generated_by: Option<i64>,
    pub generated_at: i64,
    pub is_ready: bool,
    pub is_archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report_templates::Entity",
        from = "Column::TemplateId",
        to = "super::report_templates::Column::Id"
    )]
    Template,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_report(self) -> crate::models::reports::entities::GeneratedReport {
        use crate::models::reports::entities::{FileFormat, GeneratedReport, ReportType};
        use chrono::{DateTime, NaiveDate, Utc};

        GeneratedReport {
            id: self.id,
            template_id: self.template_id,
            report_type: self
                .report_type
                .parse::<ReportType>()
                .unwrap_or(ReportType::Custom),
            report_name: self.report_name,
            description: self.description,
            parameters: serde_json::from_str(&self.parameters).unwrap_or_default(),
            start_date: self.start_date.and_then(|d| d.parse::<NaiveDate>().ok()),
            end_date: self.end_date.and_then(|d| d.parse::<NaiveDate>().ok()),
            data: serde_json::from_str(&self.data).unwrap_or_default(),
            summary: serde_json::from_str(&self.summary).unwrap_or_default(),
            file_format: self
                .file_format
                .parse::<FileFormat>()
                .unwrap_or(FileFormat::Html),
            file_size: self.file_size,
            generated_by: self.generated_by,
            generated_at: DateTime::<Utc>::from_timestamp(self.generated_at, 0)
                .unwrap_or_default(),
            is_ready: self.is_ready,
            is_archived: self.is_archived,
        }
    }
}
