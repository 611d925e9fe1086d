use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::students::entities::{EnrollmentType, Gender, Grade, StudentStatus};
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub status: Option<StudentStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
}

// 班级花名册查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct ClassRosterQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 匹配姓名、学号、身份证号、邮箱
    pub q: Option<String>,
    pub gender: Option<Gender>,
    pub status: Option<StudentStatus>,
}

/// 学生档案字段，创建与更新共用
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentProfileInput {
    pub admission_number: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: chrono::NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub address: String,
    pub county: Option<String>,
    #[serde(default)]
    pub sub_county: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub phone_number_alternative: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub emergency_contact_relationship: String,
    pub year_of_admission: i32,
    pub current_class_id: Option<i64>,
    pub course_id: Option<i64>,
    #[serde(default)]
    pub is_boarding: bool,
    #[serde(default)]
    pub has_special_needs: bool,
    #[serde(default)]
    pub special_needs_description: String,
    #[serde(default)]
    pub parent_name: String,
    #[serde(default)]
    pub parent_phone: String,
    #[serde(default)]
    pub parent_email: String,
    #[serde(default)]
    pub parent_occupation: String,
}

pub fn validate_year_of_admission(year: i32) -> Result<(), &'static str> {
    if !(2000..=2100).contains(&year) {
        return Err("Year of admission must be between 2000 and 2100");
    }
    Ok(())
}

// 创建学生请求：同时创建登录账号与学生档案
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub username: String,
    pub email: String,
    /// 为空时自动生成随机密码并在响应中返回一次
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    #[serde(flatten)]
    #[ts(flatten)]
    pub profile: StudentProfileInput,
}

impl CreateStudentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("First name and last name are required");
        }
        if self
            .profile
            .admission_number
            .as_deref()
            .is_some_and(|n| n.trim().len() > 20)
        {
            return Err("Admission number must be at most 20 characters");
        }
        validate_year_of_admission(self.profile.year_of_admission)
    }
}

// 更新学生请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub county: Option<String>,
    pub sub_county: Option<String>,
    pub ward: Option<String>,
    pub phone_number_alternative: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub year_of_admission: Option<i32>,
    pub current_class_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub is_boarding: Option<bool>,
    pub has_special_needs: Option<bool>,
    pub special_needs_description: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub parent_occupation: Option<String>,
}

// 单个选课请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct EnrollStudentRequest {
    pub class_id: i64,
    pub enrollment_type: Option<EnrollmentType>,
    pub enrollment_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub remarks: String,
}

// 新增成绩请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateAcademicRecordRequest {
    pub module_code: String,
    pub module_name: String,
    pub grade: Grade,
    pub score: f64,
    pub semester: i32,
    pub academic_year: String,
    #[serde(default)]
    pub remarks: String,
}

impl CreateAcademicRecordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.module_code.trim().is_empty() || self.module_name.trim().is_empty() {
            return Err("Module code and module name are required");
        }
        if !(0.0..=100.0).contains(&self.score) {
            return Err("Score must be between 0 and 100");
        }
        if !(1..=4).contains(&self.semester) {
            return Err("Semester must be between 1 and 4");
        }
        if self.academic_year.trim().is_empty() {
            return Err("Academic year is required");
        }
        Ok(())
    }
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub status: Option<StudentStatus>,
    pub course_id: Option<i64>,
    pub class_id: Option<i64>,
}

// 新建学生档案（用于存储层）
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub user_id: i64,
    pub admission_number: String,
    pub profile: StudentProfileInput,
    pub county: String,
}

// 新建选课（用于存储层）
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub course_id: i64,
    pub class_id: i64,
    pub enrollment_date: chrono::NaiveDate,
    pub enrollment_type: EnrollmentType,
    pub remarks: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_record_validation() {
        let mut req = CreateAcademicRecordRequest {
            module_code: "EE101".to_string(),
            module_name: "Circuits".to_string(),
            grade: Grade::B,
            score: 72.5,
            semester: 2,
            academic_year: "2025/2026".to_string(),
            remarks: String::new(),
        };
        assert!(req.validate().is_ok());
        req.score = 100.5;
        assert!(req.validate().is_err());
        req.score = 50.0;
        req.semester = 5;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_student_flattened_profile() {
        let req: CreateStudentRequest = serde_json::from_str(
            r#"{"username":"akinyi1","email":"akinyi@example.com","first_name":"Akinyi",
                "last_name":"Otieno","date_of_birth":"2004-03-02","gender":"F",
                "year_of_admission":2025}"#,
        )
        .unwrap();
        assert!(req.password.is_none());
        assert_eq!(req.profile.gender, Gender::Female);
        assert!(req.profile.admission_number.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_year_of_admission_bounds() {
        assert!(validate_year_of_admission(2000).is_ok());
        assert!(validate_year_of_admission(2100).is_ok());
        assert!(validate_year_of_admission(1999).is_err());
        assert!(validate_year_of_admission(2101).is_err());
    }
}
