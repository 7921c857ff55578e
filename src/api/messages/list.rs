use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::api::identity::request_user;
use crate::error::AppResult;
use crate::server::ChatServer;
use crate::service::parse_limit;

#[derive(serde::Deserialize)]
pub struct MessagesQuery {
    /// 原样接收，非数字时按不限条数处理
    /// Kept raw; a non-numeric value means no limit
    pub limit: Option<String>,
}

// 路由注册入口（GET）/ Route registration (GET)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.route(path, web::get().to(messages_list_handle));
}

// 请求者可见的消息 / Messages visible to the requester
pub async fn messages_list_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    query: web::Query<MessagesQuery>,
) -> AppResult<HttpResponse> {
    let user = request_user(&req);
    let limit = parse_limit(query.limit.as_deref());
    let messages = server.visibility.list_visible(user.as_deref(), limit).await?;
    Ok(HttpResponse::Ok().json(messages))
}
