use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::error::AppResult;
use crate::server::ChatServer;

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
}

pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.route(path, web::post().to(participant_create_handle));
}

/// 注册参与者：201 / 422 / 409
pub async fn participant_create_handle(
    server: web::Data<Arc<ChatServer>>,
    req: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    server.presence.register(req.name.as_deref()).await?;
    Ok(HttpResponse::Created().finish())
}
