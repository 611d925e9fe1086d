use super::entities::CourseLevel;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_bool;
use serde::Deserialize;
use ts_rs::TS;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub level: Option<CourseLevel>,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
}

fn default_duration_months() -> i32 {
    12
}

fn default_true() -> bool {
    true
}

// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub level: CourseLevel,
    #[serde(default = "default_duration_months")]
    pub duration_months: i32,
    pub department: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let code = self.code.trim();
        if code.is_empty() || code.len() > 20 {
            return Err("Course code must be between 1 and 20 characters");
        }
        if self.name.trim().is_empty() {
            return Err("Course name is required");
        }
        if self.department.trim().is_empty() {
            return Err("Department is required");
        }
        if !(1..=120).contains(&self.duration_months) {
            return Err("Duration must be between 1 and 120 months");
        }
        Ok(())
    }
}

// 更新课程请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<CourseLevel>,
    pub duration_months: Option<i32>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(code) = &self.code
            && (code.trim().is_empty() || code.trim().len() > 20)
        {
            return Err("Course code must be between 1 and 20 characters");
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("Course name is required");
        }
        if let Some(months) = self.duration_months
            && !(1..=120).contains(&months)
        {
            return Err("Duration must be between 1 and 120 months");
        }
        Ok(())
    }
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub level: Option<CourseLevel>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: &str, months: i32) -> CreateCourseRequest {
        CreateCourseRequest {
            code: code.to_string(),
            name: "Electrical Installation".to_string(),
            description: String::new(),
            level: CourseLevel::Diploma,
            duration_months: months,
            department: "Engineering".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_course_validation() {
        assert!(request("EI-01", 24).validate().is_ok());
        assert!(request("", 24).validate().is_err());
        assert!(request("EI-01", 0).validate().is_err());
        assert!(request("THIS-CODE-IS-FAR-TOO-LONG", 12).validate().is_err());
    }

    #[test]
    fn test_create_course_defaults() {
        let req: CreateCourseRequest = serde_json::from_str(
            r#"{"code":"PL1","name":"Plumbing","level":"artisan","department":"Building"}"#,
        )
        .unwrap();
        assert_eq!(req.duration_months, 12);
        assert!(req.is_active);
        assert_eq!(req.level, CourseLevel::Artisan);
    }
}
