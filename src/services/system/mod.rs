use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::config::AppConfig;
use crate::models::{ApiResponse, AppStartTime, system::SystemInfoResponse};

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    fn system_info(&self, request: &HttpRequest) -> SystemInfoResponse {
        let config = AppConfig::get();
        let now = chrono::Utc::now();
        // 未注册启动时间时按当前时间计
        let start_time = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|t| t.start_datetime)
            .unwrap_or(now);

        SystemInfoResponse {
            name: config.app.system_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.app.environment.clone(),
            start_time,
            uptime_seconds: now.signed_duration_since(start_time).num_seconds(),
        }
    }

    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            self.system_info(request),
            "Service is healthy",
        )))
    }

    pub async fn info(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            self.system_info(request),
            "System information retrieved successfully",
        )))
    }
}
