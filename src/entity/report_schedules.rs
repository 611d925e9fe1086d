//! 定时报表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "report_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub template_id: i64,
    pub frequency: String,
    pub day_of_week: Option<i32>,
    pub day_of_month: Option<i32>,
    pub hour: i32,
    pub minute: i32,
    pub email_recipients: String,
    pub notify_users: String,
    pub output_formats: String,
    pub is_active: bool,
    pub last_run: Option<i64>,
    pub next_run: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
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

impl Related<super::report_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule(self) -> crate::models::reports::entities::ReportSchedule {
        use crate::models::reports::entities::{ReportSchedule, ScheduleFrequency};
        use chrono::{DateTime, Utc};

        ReportSchedule {
            id: self.id,
            name: self.name,
            template_id: self.template_id,
            frequency: self
                .frequency
                .parse::<ScheduleFrequency>()
                .unwrap_or(ScheduleFrequency::Custom),
            day_of_week: self.day_of_week,
            day_of_month: self.day_of_month,
            hour: self.hour,
            minute: self.minute,
            email_recipients: serde_json::from_str(&self.email_recipients).unwrap_or_default(),
            notify_users: serde_json::from_str(&self.notify_users).unwrap_or_default(),
            output_formats: serde_json::from_str(&self.output_formats).unwrap_or_default(),
            is_active: self.is_active,
            last_run: self
                .last_run
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            next_run: self
                .next_run
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
