/*!
 * 速率限制中间件
 *
 * 固定时间窗口计数。已认证请求按用户 ID 计数，否则按客户端 IP。
 *
 * ```rust,ignore
 * web::scope("/api/v1/auth")
 *     .service(
 *         web::resource("/login")
 *             .wrap(RateLimit::login())
 *             .route(web::post().to(login)),
 *     )
 * ```
 *
 * 超过限制返回 429，并带上 `Retry-After` 头（距离窗口结束的秒数）。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        StatusCode,
        header::{HeaderName, HeaderValue},
    },
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ErrorCode, users::entities::User};

use super::create_error_response;

/// 最长窗口
const MAX_WINDOW_SECS: u64 = 3600;

/// 键: 前缀:身份:窗口序号，值: 窗口内已处理的请求数
static RATE_LIMIT_COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, key_prefix: &'static str) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix,
        }
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60, "login")
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60, "register")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60, "refresh")
    }

    /// 扫码签到：10 次/分钟，防止枚举二维码
    pub fn qr_check_in() -> Self {
        Self::new(10, 60, "qr_check_in")
    }

    /// 当前窗口的序号和剩余秒数
    fn window(&self, now_secs: u64) -> (u64, u64) {
        let index = now_secs / self.window_secs;
        let reset = self.window_secs - now_secs % self.window_secs;
        (index, reset)
    }
}

fn client_ip(req: &ServiceRequest) -> String {
    let peer = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    match peer {
        Some(ip) if ip.parse::<IpAddr>().is_ok() => ip,
        // realip 可能带端口或是伪造的头，退回到 socket 地址
        _ => req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    let mut response = create_error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::RateLimitExceeded,
        "Too many requests. Please try again later.",
    );
    response.headers_mut().insert(
        HeaderName::from_static("retry-after"),
        HeaderValue::from(retry_after),
    );
    response
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let user_id = req.extensions().get::<User>().map(|u| u.id);
            let identity = match user_id {
                Some(id) => format!("user:{id}"),
                None => format!("ip:{}", client_ip(&req)),
            };

            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (index, reset) = limit.window(now);
            let key = format!("{}:{}:{}", limit.key_prefix, identity, index);

            let count = RATE_LIMIT_COUNTERS
                .entry(key)
                .and_upsert_with(|entry| async move {
                    entry.map(|e| e.into_value().saturating_add(1)).unwrap_or(1)
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!("{} 触发限流 ({}/{})", identity, count, limit.max_requests);
                return Ok(req.into_response(too_many_requests(reset).map_into_right_body()));
            }

            let remaining = limit.max_requests - count;
            let mut res = srv.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::qr_check_in().key_prefix, "qr_check_in");
    }

    #[test]
    fn test_fixed_window_boundaries() {
        let limit = RateLimit::new(5, 60, "t");
        assert_eq!(limit.window(120), (2, 60));
        assert_eq!(limit.window(179), (2, 1));
        assert_eq!(limit.window(180), (3, 60));
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(RateLimit::new(1, 0, "t").window_secs, 1);
        assert_eq!(RateLimit::new(1, 86_400, "t").window_secs, MAX_WINDOW_SECS);
    }
}
