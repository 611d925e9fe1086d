/*!
 * 班级访问控制中间件
 *
 * 必须挂在 RequireJWT 之后，路由中需要 `{class_id}` 参数。
 *
 * - 管理员、教务员、系主任可以访问所有班级
 * - 任课教师只能访问自己任教的班级
 * - 学生只能访问自己有有效选课记录的班级
 *
 * 通过后把 `Class` 放入请求扩展，处理函数可以直接取用。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{info, warn};

use crate::{
    models::{
        ErrorCode,
        classes::entities::Class,
        users::entities::{User, UserType},
    },
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireClassAccess;

impl RequireClassAccess {
    /// 取出中间件已经加载的班级
    pub fn extract_class(req: &HttpRequest) -> Option<Class> {
        req.extensions().get::<Class>().cloned()
    }
}

enum Denial {
    BadRequest(&'static str),
    NotFound,
    Forbidden,
    Internal,
}

async fn check_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<Class, Denial> {
    let class = storage
        .get_class_by_id(class_id)
        .await
        .map_err(|e| {
            warn!("查询班级 {class_id} 失败: {e}");
            Denial::Internal
        })?
        .ok_or(Denial::NotFound)?;

    if user.user_type.is_management() {
        return Ok(class);
    }

    match user.user_type {
        UserType::Instructor if class.is_taught_by(user.id) => Ok(class),
        UserType::Student => {
            let student = storage
                .get_student_by_user_id(user.id)
                .await
                .map_err(|_| Denial::Internal)?
                .ok_or(Denial::Forbidden)?;
            let enrolled = storage
                .get_enrollment(student.id, class.id)
                .await
                .map_err(|_| Denial::Internal)?
                .is_some_and(|e| e.is_active);
            if enrolled { Ok(class) } else { Err(Denial::Forbidden) }
        }
        _ => Err(Denial::Forbidden),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassAccessMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassAccessMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireClassAccessMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireClassAccessMiddleware<S>
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
            let user = req.extensions().get::<User>().cloned();
            let Some(user) = user else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let class_id = req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0);
            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone());

            let outcome = match (class_id, storage) {
                (None, _) => Err(Denial::BadRequest("Missing or invalid class_id")),
                (_, None) => Err(Denial::Internal),
                (Some(class_id), Some(storage)) => check_access(&storage, &user, class_id).await,
            };

            let (status, code, message) = match outcome {
                Ok(class) => {
                    req.extensions_mut().insert(class);
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Err(Denial::BadRequest(msg)) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg),
                Err(Denial::NotFound) => {
                    (StatusCode::NOT_FOUND, ErrorCode::ClassNotFound, "Class not found")
                }
                Err(Denial::Forbidden) => {
                    info!("用户 {} 无权访问班级 {:?}", user.id, class_id);
                    (
                        StatusCode::FORBIDDEN,
                        ErrorCode::ClassPermissionDenied,
                        "You do not have access to this class",
                    )
                }
                Err(Denial::Internal) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Failed to verify class access",
                ),
            };

            Ok(req.into_response(create_error_response(status, code, message).map_into_right_body()))
        })
    }
}
