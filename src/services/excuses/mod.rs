pub mod apply;
pub mod list;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{lazy_service, respond};
use crate::models::excuses::requests::{ApplyExcuseRequest, ExcuseQueryParams, ReviewExcuseRequest};

lazy_service!(ExcuseService);

impl ExcuseService {
    pub async fn apply_excuse(
        &self,
        req: ApplyExcuseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(apply::apply_excuse(self, req, request).await)
    }

    // 按角色过滤的请假列表
    pub async fn list_excuses(
        &self,
        query: ExcuseQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_excuses(self, query, request).await)
    }

    pub async fn get_excuse(&self, excuse_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(list::get_excuse(self, excuse_id, request).await)
    }

    pub async fn review_excuse(
        &self,
        excuse_id: i64,
        req: ReviewExcuseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(review::review_excuse(self, excuse_id, req, request).await)
    }

    pub async fn cancel_excuse(
        &self,
        excuse_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(review::cancel_excuse(self, excuse_id, request).await)
    }
}
