//! 考勤课次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub instructor_id: i64,
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub topic_covered: String,
    pub venue: String,
    pub attendance_method: String,
    pub qr_code_data: Option<String>,
    pub qr_code_expiry: Option<i64>,
    pub status: String,
    pub total_present: i32,
    pub total_absent: i32,
    pub total_late: i32,
    pub created_at: i64,
    pub updated_at: i64,
    pub closed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::InstructorId",
        to = "super::users::Column::Id"
    )]
    Instructor,
    #[sea_orm(has_many = "super::attendance_records::Entity")]
    Records,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::attendance_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_session(self) -> crate::models::attendance::entities::AttendanceSession {
        use crate::models::attendance::entities::{
            AttendanceMethod, AttendanceSession, SessionStatus,
        };
        use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

        AttendanceSession {
            id: self.id,
            class_id: self.class_id,
            instructor_id: self.instructor_id,
            session_date: self.session_date.parse::<NaiveDate>().unwrap_or_default(),
            start_time: self.start_time.parse::<NaiveTime>().unwrap_or_default(),
            end_time: self.end_time.parse::<NaiveTime>().unwrap_or_default(),
            topic_covered: self.topic_covered,
            venue: self.venue,
            attendance_method: self
                .attendance_method
                .parse::<AttendanceMethod>()
                .unwrap_or(AttendanceMethod::Manual),
            qr_code_data: self.qr_code_data,
            qr_code_expiry: self
                .qr_code_expiry
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            status: self
                .status
                .parse::<SessionStatus>()
                .unwrap_or(SessionStatus::Scheduled),
            total_present: self.total_present,
            total_absent: self.total_absent,
            total_late: self.total_late,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            closed_at: self
                .closed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}
