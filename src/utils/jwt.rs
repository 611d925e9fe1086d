//! 访问令牌与刷新令牌
//!
//! access token 放在 Authorization 头中，refresh token 只通过 HttpOnly Cookie 传递。

use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";
pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

// JWT 载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,       // 用户 ID
    pub user_type: String, // 签发时的用户类型
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// refresh token 的有效期，用于设置 Cookie max-age
    pub refresh_expiry: chrono::TimeDelta,
}

pub struct JwtUtils;

impl JwtUtils {
    fn sign(
        user_id: i64,
        user_type: &str,
        kind: TokenKind,
        ttl: chrono::TimeDelta,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            user_type: user_type.to_string(),
            kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let secret = &AppConfig::get().jwt.secret;
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let secret = &AppConfig::get().jwt.secret;
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;
        if claims.kind != expected || claims.user_id().is_none() {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    /// access token 有效期（秒）
    pub fn access_token_ttl_secs() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    pub fn generate_access_token(user_id: i64, user_type: &str) -> Result<String, JwtError> {
        Self::sign(
            user_id,
            user_type,
            TokenKind::Access,
            chrono::TimeDelta::seconds(Self::access_token_ttl_secs()),
        )
    }

    /// 签发令牌对，`remember_me` 时刷新令牌使用更长的有效期
    pub fn generate_token_pair(
        user_id: i64,
        user_type: &str,
        remember_me: bool,
    ) -> Result<TokenPair, JwtError> {
        let jwt = &AppConfig::get().jwt;
        let days = if remember_me {
            jwt.refresh_token_remember_me_expiry
        } else {
            jwt.refresh_token_expiry
        };
        let refresh_expiry = chrono::TimeDelta::days(days);
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, user_type)?,
            refresh_token: Self::sign(user_id, user_type, TokenKind::Refresh, refresh_expiry)?,
            refresh_expiry,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }

    pub fn refresh_token_cookie(token: &str, expiry: chrono::TimeDelta) -> Cookie<'static> {
        Self::build_cookie(token.to_string(), expiry.num_seconds())
    }

    /// 注销时覆盖浏览器中的 refresh token
    pub fn expired_refresh_token_cookie() -> Cookie<'static> {
        Self::build_cookie(String::new(), 0)
    }

    fn build_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, value)
            .path("/api/v1/auth")
            .max_age(actix_web::cookie::time::Duration::seconds(max_age_secs))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn refresh_token_from_request(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 从 `Authorization: Bearer xxx` 中取出令牌
    pub fn bearer_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix(TOKEN_TYPE))
            .and_then(|v| v.strip_prefix(' '))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let pair = JwtUtils::generate_token_pair(7, "instructor", false).unwrap();
        let claims = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.user_type, "instructor");

        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_remember_me_extends_refresh_expiry() {
        let short = JwtUtils::generate_token_pair(1, "student", false).unwrap();
        let long = JwtUtils::generate_token_pair(1, "student", true).unwrap();
        assert!(long.refresh_expiry > short.refresh_expiry);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(JwtUtils::verify_access_token("not-a-jwt").is_err());
    }
}
