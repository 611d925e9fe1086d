//! 学生档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub admission_number: String,
    pub national_id: Option<String>,
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub county: String,
    pub sub_county: String,
    pub ward: String,
    pub phone_number_alternative: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: String,
    pub year_of_admission: i32,
    pub current_class_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: String,
    pub is_boarding: bool,
    pub has_special_needs: bool,
    pub special_needs_description: String,
    pub parent_name: String,
    pub parent_phone: String,
    pub parent_email: String,
    pub parent_occupation: String,
    pub last_attendance_date: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::CurrentClassId",
        to = "super::classes::Column::Id"
    )]
    CurrentClass,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::attendance_records::Entity")]
    AttendanceRecords,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::attendance_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::{Gender, Student, StudentStatus};
        use chrono::{DateTime, NaiveDate, Utc};

        Student {
            id: self.id,
            user_id: self.user_id,
            admission_number: self.admission_number,
            national_id: self.national_id,
            date_of_birth: self.date_of_birth.parse::<NaiveDate>().unwrap_or_default(),
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::Other),
            address: self.address,
            county: self.county,
            sub_county: self.sub_county,
            ward: self.ward,
            phone_number_alternative: self.phone_number_alternative,
            emergency_contact_name: self.emergency_contact_name,
            emergency_contact_phone: self.emergency_contact_phone,
            emergency_contact_relationship: self.emergency_contact_relationship,
            year_of_admission: self.year_of_admission,
            current_class_id: self.current_class_id,
            course_id: self.course_id,
            status: self
                .status
                .parse::<StudentStatus>()
                .unwrap_or(StudentStatus::Active),
            is_boarding: self.is_boarding,
            has_special_needs: self.has_special_needs,
            special_needs_description: self.special_needs_description,
            parent_name: self.parent_name,
            parent_phone: self.parent_phone,
            parent_email: self.parent_email,
            parent_occupation: self.parent_occupation,
            last_attendance_date: self
                .last_attendance_date
                .and_then(|d| d.parse::<NaiveDate>().ok()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
