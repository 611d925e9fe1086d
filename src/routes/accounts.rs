use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::users::entities::UserType;
use crate::models::users::requests::{
    AccountReviewRequest, CreateUserRequest, UpdateUserRequest, UserListParams,
};
use crate::services::AccountService;
use crate::utils::SafeIDI64;

static ACCOUNT_SERVICE: Lazy<AccountService> = Lazy::new(AccountService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn list_pending_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.list_pending_users(query.into_inner(), &req).await
}

pub async fn list_instructors(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.list_instructors(&req).await
}

pub async fn create_user(
    req: HttpRequest,
    body: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.create_user(body.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.get_user(id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.update_user(id.0, body.into_inner(), &req).await
}

pub async fn delete_user(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.delete_user(id.0, &req).await
}

pub async fn approve_user(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.approve_user(id.0, &req).await
}

pub async fn reject_user(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<AccountReviewRequest>,
) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.reject_user(id.0, body.into_inner(), &req).await
}

pub async fn suspend_user(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<AccountReviewRequest>,
) -> ActixResult<HttpResponse> {
    ACCOUNT_SERVICE.suspend_user(id.0, body.into_inner(), &req).await
}

// 配置路由
pub fn configure_account_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            // 分配任课教师时的下拉框，教务管理角色可用
            .service(
                web::resource("/instructors")
                    .wrap(RequireRole::new_any(UserType::management_roles()))
                    .route(web::get().to(list_instructors)),
            )
            .service(
                web::scope("")
                    .wrap(RequireRole::new_any(UserType::admin_roles()))
                    .service(
                        web::resource("")
                            .route(web::get().to(list_users))
                            .route(web::post().to(create_user)),
                    )
                    .route("/pending", web::get().to(list_pending_users))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(get_user))
                            .route(web::put().to(update_user))
                            .route(web::delete().to(delete_user)),
                    )
                    .route("/{id}/approve", web::post().to(approve_user))
                    .route("/{id}/reject", web::post().to(reject_user))
                    .route("/{id}/suspend", web::post().to(suspend_user)),
            ),
    );
}
