use crate::models::common::string_enum;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 性别
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

string_enum!(Gender, "gender", { Male => "M", Female => "F", Other => "O" });

// 学籍状态
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum StudentStatus {
    Active,
    Inactive,
    Suspended,
    Graduated,
    Dropped,
}

string_enum!(StudentStatus, "student status", {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
    Graduated => "graduated",
    Dropped => "dropped",
});

impl StudentStatus {
    /// 启用/停用切换：active 变为 inactive，其余状态恢复为 active
    pub fn toggled(&self) -> Self {
        match self {
            StudentStatus::Active => StudentStatus::Inactive,
            _ => StudentStatus::Active,
        }
    }
}

// 选课方式
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum EnrollmentType {
    Regular,
    Evening,
    Weekend,
    Distance,
}

string_enum!(EnrollmentType, "enrollment type", {
    Regular => "regular",
    Evening => "evening",
    Weekend => "weekend",
    Distance => "distance",
});

// 成绩等级
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

string_enum!(Grade, "grade", { A => "A", B => "B", C => "C", D => "D", E => "E", F => "F" });

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub admission_number: String,
    pub national_id: Option<String>,
    pub date_of_birth: chrono::NaiveDate,
    pub gender: Gender,
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
    pub status: StudentStatus,
    pub is_boarding: bool,
    pub has_special_needs: bool,
    pub special_needs_description: String,
    pub parent_name: String,
    pub parent_phone: String,
    pub parent_email: String,
    pub parent_occupation: String,
    pub last_attendance_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub class_id: i64,
    pub enrollment_date: chrono::NaiveDate,
    pub enrollment_type: EnrollmentType,
    pub is_active: bool,
    pub completion_date: Option<chrono::NaiveDate>,
    pub remarks: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学业成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct AcademicRecord {
    pub id: i64,
    pub student_id: i64,
    pub module_code: String,
    pub module_name: String,
    pub grade: Grade,
    pub score: f64,
    pub semester: i32,
    pub academic_year: String,
    pub remarks: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学号中年份前缀之后的序号，序号部分必须全是数字
pub fn admission_sequence(year_prefix: &str, number: &str) -> Option<u32> {
    let seq = number.strip_prefix(year_prefix)?;
    if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    seq.parse().ok()
}

/// 计算下一个学号：`{prefix}{year}{序号:04}`
///
/// `last_seq` 为当年已用的最大序号。
pub fn next_admission_number(prefix: &str, year: i32, last_seq: Option<u32>) -> String {
    let next = last_seq.map_or(1, |seq| seq.saturating_add(1));
    format!("{prefix}{year}{next:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_admission_number_starts_at_one() {
        assert_eq!(next_admission_number("TVET", 2025, None), "TVET20250001");
    }

    #[test]
    fn test_next_admission_number_increments() {
        assert_eq!(
            next_admission_number("TVET", 2025, Some(41)),
            "TVET20250042"
        );
        assert_eq!(
            next_admission_number("TVET", 2025, Some(9999)),
            "TVET202510000"
        );
    }

    #[test]
    fn test_admission_sequence_requires_digits() {
        assert_eq!(admission_sequence("TVET2025", "TVET20250041"), Some(41));
        assert_eq!(admission_sequence("TVET2025", "TVET2025A01"), None);
        assert_eq!(admission_sequence("TVET2025", "TVET2025+7"), None);
        assert_eq!(admission_sequence("TVET2025", "TVET2025"), None);
        assert_eq!(admission_sequence("TVET2025", "MANUAL-77"), None);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(StudentStatus::Active.toggled(), StudentStatus::Inactive);
        assert_eq!(StudentStatus::Inactive.toggled(), StudentStatus::Active);
        assert_eq!(StudentStatus::Suspended.toggled(), StudentStatus::Active);
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::Female.to_string(), "F");
        assert_eq!("O".parse::<Gender>().unwrap(), Gender::Other);
        assert!("X".parse::<Gender>().is_err());
        let g: Gender = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(serde_json::to_string(&g).unwrap(), "\"M\"");
    }
}
