pub mod dashboard;
pub mod login;
pub mod profile;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::config::AppConfig;
use crate::models::auth::{LoginRequest, RegisterRequest, UpdateProfileRequest};

lazy_service!(AuthService);

impl AuthService {
    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 学生自助注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(register::handle_register(self, register_request, request).await)
    }

    // 登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(login::handle_login(self, login_request, request).await)
    }

    pub async fn logout(&self) -> ActixResult<HttpResponse> {
        respond(login::handle_logout())
    }

    // 刷新 access token
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(token::handle_refresh_token(self, request).await)
    }

    pub async fn verify_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(token::handle_verify_token(request))
    }

    // 当前用户信息
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(token::handle_me(request))
    }

    pub async fn update_profile(
        &self,
        update_request: UpdateProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(profile::handle_update_profile(self, update_request, request).await)
    }

    // 首页：进行中的课次
    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(dashboard::handle_dashboard(self, request).await)
    }
}
