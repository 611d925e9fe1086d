use crate::models::common::PaginationQuery;
use crate::models::common::pagination::{deserialize_optional_bool, deserialize_optional_i64};
use crate::models::students::entities::EnrollmentType;
use serde::Deserialize;
use ts_rs::TS;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub instructor_id: Option<i64>,
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
}

fn default_max_students() -> i32 {
    30
}

fn default_semester() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

// 创建班级请求
//
// instructor_id 可为空，稍后通过分配接口指定；指定时必须是 instructor 类型用户
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub course_id: i64,
    pub class_code: String,
    pub name: String,
    pub instructor_id: Option<i64>,
    pub academic_year: String,
    #[serde(default = "default_semester")]
    pub semester: i32,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    #[serde(default)]
    pub meeting_days: String,
    #[serde(default)]
    pub meeting_time: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default = "default_max_students")]
    pub max_students: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CreateClassRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.class_code.trim().is_empty() || self.class_code.trim().len() > 20 {
            return Err("Class code must be between 1 and 20 characters");
        }
        if self.name.trim().is_empty() {
            return Err("Class name is required");
        }
        if self.academic_year.trim().is_empty() {
            return Err("Academic year is required");
        }
        validate_schedule(self.start_date, self.end_date, self.semester, self.max_students)
    }
}

/// 日期区间、学期、容量的共同校验
pub fn validate_schedule(
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    semester: i32,
    max_students: i32,
) -> Result<(), &'static str> {
    if start_date > end_date {
        return Err("End date must be after start date");
    }
    if semester < 1 {
        return Err("Semester must be at least 1");
    }
    if max_students < 1 {
        return Err("Maximum students must be at least 1");
    }
    Ok(())
}

// 更新班级请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub course_id: Option<i64>,
    pub class_code: Option<String>,
    pub name: Option<String>,
    pub academic_year: Option<String>,
    pub semester: Option<i32>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub meeting_days: Option<String>,
    pub meeting_time: Option<String>,
    pub venue: Option<String>,
    pub max_students: Option<i32>,
    pub is_active: Option<bool>,
}

// 分配教师请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct AssignInstructorRequest {
    pub instructor_id: i64,
}

// 批量选课请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct EnrollStudentsRequest {
    pub student_ids: Vec<i64>,
    pub enrollment_type: Option<EnrollmentType>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub course_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_schedule_validation() {
        assert!(validate_schedule(date(2025, 1, 6), date(2025, 4, 4), 1, 30).is_ok());
        assert!(validate_schedule(date(2025, 4, 4), date(2025, 1, 6), 1, 30).is_err());
        assert!(validate_schedule(date(2025, 1, 6), date(2025, 1, 6), 0, 30).is_err());
        assert!(validate_schedule(date(2025, 1, 6), date(2025, 1, 6), 2, 0).is_err());
    }

    #[test]
    fn test_create_class_defaults() {
        let req: CreateClassRequest = serde_json::from_str(
            r#"{"course_id":1,"class_code":"EI-2025A","name":"Electrical A",
                "academic_year":"2025/2026","start_date":"2025-01-06","end_date":"2025-04-04"}"#,
        )
        .unwrap();
        assert_eq!(req.max_students, 30);
        assert_eq!(req.semester, 1);
        assert!(req.instructor_id.is_none());
        assert!(req.validate().is_ok());
    }
}
