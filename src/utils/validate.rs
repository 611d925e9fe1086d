use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@.+_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ]{9,15}$").expect("Invalid phone regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 3 <= 长度 <= 30
    if username.len() < 3 || username.len() > 30 {
        return Err("Username length must be between 3 and 30 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may contain only letters, digits and @/./+/-/_ characters");
    }
    Ok(())
}

/// 手机号：可选 + 前缀，9 到 15 位数字（允许空格）
pub fn validate_phone_number(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone.trim()) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略检查结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

// 常见弱密码，比较时忽略大小写
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "student123",
    "tvet12345",
    "welcome1",
];

type PasswordRule = (fn(&str) -> bool, &'static str);

const PASSWORD_RULES: &[PasswordRule] = &[
    (|p: &str| p.chars().count() >= 8, "Password must be at least 8 characters long"),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_uppercase()),
        "Password must contain at least one uppercase letter",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_lowercase()),
        "Password must contain at least one lowercase letter",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_digit()),
        "Password must contain at least one digit",
    ),
    (
        |p: &str| !p.chars().all(|c| c.is_ascii_digit()),
        "Password cannot be entirely numeric",
    ),
    (
        |p: &str| !COMMON_PASSWORDS.iter().any(|w| p.eq_ignore_ascii_case(w)),
        "Password is too common, please choose a stronger password",
    ),
];

/// 密码策略：至少 8 位，包含大小写字母与数字，不能是纯数字或常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let errors: Vec<&'static str> = PASSWORD_RULES
        .iter()
        .filter(|(check, _)| !check(password))
        .map(|(_, message)| *message)
        .collect();

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("jdoe").is_ok());
        assert!(validate_username("j.doe+tvet@kitui").is_ok());
        assert!(validate_username("jd").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_email_and_phone() {
        assert!(validate_email("registrar@kitui-tvet.ac.ke").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_phone_number("+254 712 345678").is_ok());
        assert!(validate_phone_number("0712345678").is_ok());
        assert!(validate_phone_number("call me").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Mwingi2025").is_valid);

        let short = validate_password("Ab1");
        assert!(!short.is_valid);
        assert!(short.errors.contains(&"Password must be at least 8 characters long"));

        let lower_only = validate_password("kitui2025");
        assert!(
            lower_only
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_numeric_and_common_passwords() {
        let numeric = validate_password("1234567890");
        assert!(numeric.errors.contains(&"Password cannot be entirely numeric"));

        let common = validate_password("Password1");
        assert!(
            common
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
        assert!(validate_password_simple("Password1").is_err());
    }
}
