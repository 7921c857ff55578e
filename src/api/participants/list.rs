use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::error::AppResult;
use crate::server::ChatServer;

// 路由注册入口（GET）/ Route registration (GET)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.route(path, web::get().to(participants_list_handle));
}

// 全部参与者 / Every participant
pub async fn participants_list_handle(
    server: web::Data<Arc<ChatServer>>,
) -> AppResult<HttpResponse> {
    let participants = server.presence.list().await?;
    Ok(HttpResponse::Ok().json(participants))
}
