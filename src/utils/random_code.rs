use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成指定长度的随机字母数字串
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成满足密码策略的随机初始密码（大小写字母 + 数字）
pub fn generate_initial_password() -> String {
    let mut rng = rand::rng();
    let upper = rng.random_range(b'A'..=b'Z') as char;
    let lower = rng.random_range(b'a'..=b'z') as char;
    let digit = rng.random_range(b'0'..=b'9') as char;
    format!("{upper}{lower}{digit}{}", generate_random_code(9))
}

/// 课次签到二维码内容：`ATTENDANCE_{class_id}_{32 位十六进制}`
pub fn generate_qr_token(class_id: i64) -> String {
    format!("ATTENDANCE_{class_id}_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_random_code_length() {
        let code = generate_random_code(12);
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_initial_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_initial_password();
            assert!(validate_password(&password).is_valid, "{password}");
        }
    }

    #[test]
    fn test_qr_token_format() {
        let token = generate_qr_token(42);
        let suffix = token.strip_prefix("ATTENDANCE_42_").unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_qr_token(42));
    }
}
