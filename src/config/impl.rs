use std::sync::OnceLock;

use chrono::{FixedOffset, Offset, Utc};
use config::{Config, ConfigError, Environment, File};

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 常用部署环境变量到配置键的映射，优先级高于 `TVET_` 前缀变量
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("app.environment", "APP_ENV"),
    ("app.log_level", "RUST_LOG"),
    ("server.host", "SERVER_HOST"),
    ("server.port", "SERVER_PORT"),
    ("server.unix_socket_path", "UNIX_SOCKET"),
    ("server.workers", "CPU_COUNT"),
    ("jwt.secret", "JWT_SECRET"),
    ("database.url", "DATABASE_URL"),
    ("cache.type", "CACHE_TYPE"),
    ("cache.redis.url", "REDIS_URL"),
    ("cache.redis.key_prefix", "REDIS_KEY_PREFIX"),
    ("cache.default_ttl", "REDIS_TTL"),
    ("attendance.utc_offset_hours", "SCHOOL_UTC_OFFSET"),
];

impl AppConfig {
    /// 依次合并 config.toml、config.{APP_ENV}.toml、TVET_* 环境变量和 [`ENV_OVERRIDES`]
    pub fn load() -> Result<Self, ConfigError> {
        let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{env_name}")).required(false))
            .add_source(
                Environment::with_prefix("TVET")
                    .separator("_")
                    .try_parsing(true),
            );
        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }
        app_config.validate()?;

        Ok(app_config)
    }

    /// 检查取值范围，启动时发现配置错误
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Message(msg.to_string()));

        if !(-12..=14).contains(&self.attendance.utc_offset_hours) {
            return invalid("attendance.utc_offset_hours must be between -12 and 14");
        }
        if self.attendance.qr_code_validity_minutes <= 0 {
            return invalid("attendance.qr_code_validity_minutes must be positive");
        }
        if self.attendance.max_report_days <= 0 {
            return invalid("attendance.max_report_days must be positive");
        }
        if self.attendance.admission_prefix.trim().is_empty() {
            return invalid("attendance.admission_prefix must not be empty");
        }
        if self.is_production() && self.jwt.secret.len() < 32 {
            return invalid("jwt.secret must be at least 32 characters in production");
        }
        Ok(())
    }

    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用一次，之后通过 [`AppConfig::get`] 读取
    pub fn init() -> Result<(), ConfigError> {
        APP_CONFIG
            .set(Self::load()?)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 学校所在时区，越界时退回 UTC
    pub fn school_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.attendance.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        Config::builder()
            .add_source(File::from_str(
                include_str!("../../config.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.school_offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let mut config = sample();
        config.attendance.utc_offset_hours = 15;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_report_window_must_be_positive() {
        let mut config = sample();
        config.attendance.max_report_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_long_secret() {
        let mut config = sample();
        config.app.environment = "production".to_string();
        config.jwt.secret = "short".to_string();
        assert!(config.validate().is_err());
        config.jwt.secret = "x".repeat(32);
        assert!(config.validate().is_ok());
    }
}
