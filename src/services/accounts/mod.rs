pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod review;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::models::users::requests::{
    AccountReviewRequest, CreateUserRequest, UpdateUserRequest, UserListParams,
};

lazy_service!(AccountService);

impl AccountService {
    // 用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_users(self, query, request).await)
    }

    // 待审核的教职工账号
    pub async fn list_pending_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_pending_users(self, query, request).await)
    }

    pub async fn list_instructors(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(list::list_instructors(self, request).await)
    }

    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_user(self, user_data, request).await)
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(get::get_user(self, user_id, request).await)
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::update_user(self, user_id, update_data, request).await)
    }

    // 删除用户（不能删除自己）
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(delete::delete_user(self, user_id, request).await)
    }

    pub async fn approve_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(review::approve_user(self, user_id, request).await)
    }

    pub async fn reject_user(
        &self,
        user_id: i64,
        review: AccountReviewRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(review::reject_user(self, user_id, review, request).await)
    }

    pub async fn suspend_user(
        &self,
        user_id: i64,
        review: AccountReviewRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(review::suspend_user(self, user_id, review, request).await)
    }
}
