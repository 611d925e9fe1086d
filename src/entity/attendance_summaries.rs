//! 周期考勤汇总实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_summaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub period_type: String,
    pub period_start: String,
    pub period_end: String,
    pub total_sessions: i32,
    pub present_count: i32,
    pub absent_count: i32,
    pub late_count: i32,
    pub excused_count: i32,
    pub attendance_rate: f64,
    pub punctuality_rate: f64,
    pub previous_period_rate: Option<f64>,
    pub trend: String,
    pub created_at: i64,
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
    pub fn into_summary(self) -> crate::models::attendance::entities::AttendanceSummary {
        use crate::models::attendance::entities::{AttendanceSummary, PeriodType, Trend};
        use chrono::{DateTime, NaiveDate, Utc};

        AttendanceSummary {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            period_type: self
                .period_type
                .parse::<PeriodType>()
                .unwrap_or(PeriodType::Weekly),
            period_start: self.period_start.parse::<NaiveDate>().unwrap_or_default(),
            period_end: self.period_end.parse::<NaiveDate>().unwrap_or_default(),
            total_sessions: self.total_sessions,
            present_count: self.present_count,
            absent_count: self.absent_count,
            late_count: self.late_count,
            excused_count: self.excused_count,
            attendance_rate: self.attendance_rate,
            punctuality_rate: self.punctuality_rate,
            previous_period_rate: self.previous_period_rate,
            trend: self.trend.parse::<Trend>().unwrap_or(Trend::Stable),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
