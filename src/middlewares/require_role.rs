/*!
 * 基于用户类型的访问控制中间件
 *
 * 必须挂在 RequireJWT 之后。
 *
 * ```rust,ignore
 * web::scope("/api/v1/users")
 *     .wrap(RequireRole::new_any(UserType::admin_roles()))
 *     .wrap(RequireJWT);
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{ErrorCode, users::entities::{User, UserType}};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Vec<UserType>,
}

impl RequireRole {
    pub fn new(user_type: &UserType) -> Self {
        Self {
            allowed: vec![user_type.clone()],
        }
    }

    /// 任一用户类型即可
    pub fn new_any(user_types: &[&UserType]) -> Self {
        Self {
            allowed: user_types.iter().map(|t| (*t).clone()).collect(),
        }
    }

    fn permits(allowed: &[UserType], user_type: &UserType) -> bool {
        allowed.contains(user_type)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: Rc::new(self.allowed.clone()),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<UserType>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let user_type = req.extensions().get::<User>().map(|u| (u.id, u.user_type.clone()));

            match user_type {
                Some((_, ref user_type)) if RequireRole::permits(&allowed, user_type) => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Some((user_id, user_type)) => {
                    info!("用户 {user_id} ({user_type}) 无权访问 {}，允许: {:?}", req.path(), allowed);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::PermissionDenied,
                            "You do not have permission to access this resource",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("角色校验时请求中没有用户信息，RequireJWT 是否已挂载?");
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_roles_exclude_instructor() {
        let role = RequireRole::new_any(UserType::management_roles());
        assert!(RequireRole::permits(&role.allowed, &UserType::Hod));
        assert!(RequireRole::permits(&role.allowed, &UserType::Registrar));
        assert!(!RequireRole::permits(&role.allowed, &UserType::Instructor));
        assert!(!RequireRole::permits(&role.allowed, &UserType::Student));
    }

    #[test]
    fn test_single_role() {
        let role = RequireRole::new(&UserType::Admin);
        assert!(RequireRole::permits(&role.allowed, &UserType::Admin));
        assert!(!RequireRole::permits(&role.allowed, &UserType::Hod));
    }
}
