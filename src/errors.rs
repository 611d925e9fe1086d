//! 存储层与工具函数共用的错误类型
//!
//! 每个变体带一个错误代码（E0xx）和类型名，HTTP 层再映射为 [`crate::models::ErrorCode`]。

use std::fmt;

/// 生成枚举、`code()` / `error_type()` / `message()` 以及 snake_case 构造函数
macro_rules! define_attendance_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AttendanceError {
            $($variant(String),)*
        }

        impl AttendanceError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(AttendanceError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AttendanceError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(AttendanceError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl AttendanceError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AttendanceError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_attendance_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    InvalidTransition("E014", "Invalid State Transition"),
    Export("E015", "Export Error"),
}

impl fmt::Display for AttendanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for AttendanceError {}

/// 外部错误按类别落到对应变体，只保留错误文本
macro_rules! convert_errors {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for AttendanceError {
                fn from(err: $source) -> Self {
                    AttendanceError::$variant(err.to_string())
                }
            }
        )*
    };
}

convert_errors! {
    sea_orm::DbErr => DatabaseOperation,
    std::io::Error => FileOperation,
    serde_json::Error => Serialization,
    chrono::ParseError => DateParse,
    csv::Error => Export,
    rust_xlsxwriter::XlsxError => Export,
}

impl AttendanceError {
    /// 是否为唯一约束冲突（仅数据库错误可能命中）
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AttendanceError::DatabaseOperation(msg) | AttendanceError::Conflict(msg) => {
                msg.contains("UNIQUE constraint failed")
                    || msg.contains("duplicate key")
                    || msg.contains("Duplicate entry")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AttendanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AttendanceError::cache_connection("test").code(), "E001");
        assert_eq!(AttendanceError::database_config("test").code(), "E003");
        assert_eq!(AttendanceError::validation("test").code(), "E007");
        assert_eq!(AttendanceError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AttendanceError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            AttendanceError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_display_and_conversion() {
        let err: AttendanceError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.to_string().starts_with("Database Operation Error: "));
    }

    #[test]
    fn test_error_message() {
        let err = AttendanceError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_new_variants() {
        assert_eq!(AttendanceError::conflict("dup").code(), "E010");
        assert_eq!(
            AttendanceError::invalid_transition("x").error_type(),
            "Invalid State Transition"
        );
    }

    #[test]
    fn test_unique_violation_detection() {
        let sqlite = AttendanceError::database_operation(
            "创建课次失败: UNIQUE constraint failed: attendance_sessions.class_id",
        );
        assert!(sqlite.is_unique_violation());

        let pg = AttendanceError::database_operation(
            "duplicate key value violates unique constraint \"uk_records_session_student\"",
        );
        assert!(pg.is_unique_violation());

        assert!(!AttendanceError::validation("UNIQUE constraint failed").is_unique_violation());
        assert!(!AttendanceError::database_operation("connection reset").is_unique_violation());
    }

    #[test]
    fn test_format_simple() {
        let err = AttendanceError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
