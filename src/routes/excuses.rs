use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::excuses::requests::{ApplyExcuseRequest, ExcuseQueryParams, ReviewExcuseRequest};
use crate::models::users::entities::UserType;
use crate::services::ExcuseService;
use crate::utils::SafeIDI64;

static EXCUSE_SERVICE: Lazy<ExcuseService> = Lazy::new(ExcuseService::new_lazy);

pub async fn list_excuses(
    req: HttpRequest,
    query: web::Query<ExcuseQueryParams>,
) -> ActixResult<HttpResponse> {
    EXCUSE_SERVICE.list_excuses(query.into_inner(), &req).await
}

pub async fn apply_excuse(
    req: HttpRequest,
    body: web::Json<ApplyExcuseRequest>,
) -> ActixResult<HttpResponse> {
    EXCUSE_SERVICE.apply_excuse(body.into_inner(), &req).await
}

pub async fn get_excuse(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXCUSE_SERVICE.get_excuse(id.0, &req).await
}

pub async fn review_excuse(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ReviewExcuseRequest>,
) -> ActixResult<HttpResponse> {
    EXCUSE_SERVICE.review_excuse(id.0, body.into_inner(), &req).await
}

pub async fn cancel_excuse(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXCUSE_SERVICE.cancel_excuse(id.0, &req).await
}

// 配置路由
pub fn configure_excuse_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/excuses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_excuses))
                    .route(
                        web::post()
                            .to(apply_excuse)
                            .wrap(RequireRole::new(&UserType::Student)),
                    ),
            )
            .route("/{id}", web::get().to(get_excuse))
            .service(
                web::resource("/{id}/review").route(
                    web::post()
                        .to(review_excuse)
                        // 任课教师审核本班申请，管理员可审核全部
                        .wrap(RequireRole::new_any(UserType::instructor_roles())),
                ),
            )
            .service(
                web::resource("/{id}/cancel").route(
                    web::post()
                        .to(cancel_excuse)
                        .wrap(RequireRole::new(&UserType::Student)),
                ),
            ),
    );
}
