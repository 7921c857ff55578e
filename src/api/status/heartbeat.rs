use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::api::identity::request_user;
use crate::error::AppResult;
use crate::server::ChatServer;

pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.route(path, web::post().to(status_heartbeat_handle));
}

// 心跳：200 / 404
pub async fn status_heartbeat_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let user = request_user(&req);
    server.presence.heartbeat(user.as_deref()).await?;
    Ok(HttpResponse::Ok().finish())
}
