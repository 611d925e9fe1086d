//! 报表模板实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "report_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub report_type: String,
    pub description: String,
    /// JSON 对象
    pub parameters: String,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report_schedules::Entity")]
    Schedules,
}

impl Related<super::report_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_template(self) -> crate::models::reports::entities::ReportTemplate {
        use crate::models::reports::entities::{ReportTemplate, ReportType};
        use chrono::{DateTime, Utc};

        ReportTemplate {
            id: self.id,
            name: self.name,
            report_type: self
                .report_type
                .parse::<ReportType>()
                .unwrap_or(ReportType::Custom),
            description: self.description,
            parameters: serde_json::from_str(&self.parameters).unwrap_or_default(),
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
