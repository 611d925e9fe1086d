use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程层次
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub enum CourseLevel {
    Certificate,
    Diploma,
    Artisan,
    Craft,
}

impl<'de> Deserialize<'de> for CourseLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CourseLevel>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的课程层次: '{s}'. 支持: certificate, diploma, artisan, craft"
            ))
        })
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseLevel::Certificate => write!(f, "certificate"),
            CourseLevel::Diploma => write!(f, "diploma"),
            CourseLevel::Artisan => write!(f, "artisan"),
            CourseLevel::Craft => write!(f, "craft"),
        }
    }
}

impl std::str::FromStr for CourseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "certificate" => Ok(CourseLevel::Certificate),
            "diploma" => Ok(CourseLevel::Diploma),
            "artisan" => Ok(CourseLevel::Artisan),
            "craft" => Ok(CourseLevel::Craft),
            _ => Err(format!("Invalid course level: {s}")),
        }
    }
}

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub level: CourseLevel,
    pub duration_months: i32,
    pub department: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
