use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 所属课程
    pub course_id: i64,
    // 班级代码（唯一）
    pub class_code: String,
    // 班级名称
    pub name: String,
    // 任课教师
    pub instructor_id: Option<i64>,
    // 学年，如 2025/2026
    pub academic_year: String,
    pub semester: i32,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    // 上课日，如 "Mon,Wed,Fri"
    pub meeting_days: String,
    pub meeting_time: String,
    pub venue: String,
    pub max_students: i32,
    pub is_active: bool,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn is_taught_by(&self, user_id: i64) -> bool {
        self.instructor_id == Some(user_id)
    }
}
