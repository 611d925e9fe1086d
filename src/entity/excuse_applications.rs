//! 请假申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "excuse_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub attendance_session_id: Option<i64>,
    pub reason: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub reviewed_by: Option<i64>,
    pub review_notes: String,
    pub reviewed_at: Option<i64>,
    pub applied_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_excuse(self) -> crate::models::excuses::entities::ExcuseApplication {
        use crate::models::excuses::entities::{ExcuseApplication, ExcuseStatus};
        use chrono::{DateTime, NaiveDate, Utc};

        ExcuseApplication {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            attendance_session_id: self.attendance_session_id,
            reason: self.reason,
            start_date: self.start_date.parse::<NaiveDate>().unwrap_or_default(),
            end_date: self.end_date.parse::<NaiveDate>().unwrap_or_default(),
            status: self
                .status
                .parse::<ExcuseStatus>()
                .unwrap_or(ExcuseStatus::Pending),
            reviewed_by: self.reviewed_by,
            review_notes: self.review_notes,
            reviewed_at: self
                .reviewed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            applied_at: DateTime::<Utc>::from_timestamp(self.applied_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
