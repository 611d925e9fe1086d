//! 学业成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub module_code: String,
    pub module_name: String,
    pub grade: String,
    pub score: f64,
    pub semester: i32,
    pub academic_year: String,
    pub remarks: String,
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
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_academic_record(self) -> crate::models::students::entities::AcademicRecord {
        use crate::models::students::entities::{AcademicRecord, Grade};
        use chrono::{DateTime, Utc};

        AcademicRecord {
            id: self.id,
            student_id: self.student_id,
            module_code: self.module_code,
            module_name: self.module_name,
            grade: self.grade.parse::<Grade>().unwrap_or(Grade::F),
            score: self.score,
            semester: self.semester,
            academic_year: self.academic_year,
            remarks: self.remarks,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
