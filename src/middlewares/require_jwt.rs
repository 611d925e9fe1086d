/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 access token，加载当前用户并放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/attendance")
 *     .wrap(RequireJWT)
 *     .route("/sessions", web::get().to(list_sessions));
 *
 * // 处理函数中
 * let user = RequireJWT::extract_user_claims(&req);
 * ```
 *
 * 用户按 ID 缓存，账号审核状态变化时由服务层清除缓存。
 * 待审核、已拒绝、已停用或未激活的账号即使持有有效令牌也返回 401。
 */

use crate::cache::{ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{AccountStatus, User};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireJWT;

struct AuthFailure {
    code: ErrorCode,
    message: String,
}

impl AuthFailure {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

async fn load_user(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = JwtUtils::bearer_token(req.request()).ok_or_else(|| {
        AuthFailure::new(ErrorCode::Unauthorized, "Missing or invalid Authorization header")
    })?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|e| {
        info!("access token 校验失败: {e}");
        AuthFailure::new(ErrorCode::Unauthorized, "Invalid or expired token")
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthFailure::new(ErrorCode::Unauthorized, "Invalid token subject"))?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());
    let key = user_cache_key(user_id);

    let cached = match &cache {
        Some(cache) => cache.get_json::<User>(&key).await,
        None => None,
    };

    let user = match cached {
        Some(user) => user,
        None => {
            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone())
                .ok_or_else(|| {
                    warn!("请求上下文中缺少存储实例");
                    AuthFailure::new(ErrorCode::InternalServerError, "Storage unavailable")
                })?;

            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|e| {
                    warn!("加载用户 {user_id} 失败: {e}");
                    AuthFailure::new(ErrorCode::InternalServerError, "Failed to load user")
                })?
                .ok_or_else(|| AuthFailure::new(ErrorCode::Unauthorized, "User not found"))?;

            if let Some(cache) = &cache {
                cache
                    .insert_json(key, &user, AppConfig::get().cache.default_ttl)
                    .await;
            }
            user
        }
    };

    if let Some(reason) = user.login_block_reason() {
        let code = match user.account_status {
            AccountStatus::Approved => ErrorCode::AccountInactive,
            _ => ErrorCode::AccountNotApproved,
        };
        return Err(AuthFailure::new(code, reason));
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接放行给 CORS 处理
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match load_user(&req).await {
                Ok(user) => {
                    debug!("用户 {} ({}) 认证通过", user.id, user.user_type);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(failure) => {
                    info!("{} 认证失败: {}", req.path(), failure.message);
                    let status = if failure.code == ErrorCode::InternalServerError {
                        StatusCode::INTERNAL_SERVER_ERROR
                    } else {
                        StatusCode::UNAUTHORIZED
                    };
                    Ok(req.into_response(
                        create_error_response(status, failure.code, &failure.message)
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 取出当前登录用户，只能在挂载了 RequireJWT 的路由中使用
    pub fn extract_user_claims(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}
