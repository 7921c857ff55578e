use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::api::identity::request_user;
use crate::error::AppResult;
use crate::server::ChatServer;
use crate::service::MessageDraft;

pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.route(path, web::post().to(message_send_handle));
}

/// 发送消息：201 / 422
pub async fn message_send_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<MessageDraft>,
) -> AppResult<HttpResponse> {
    let user = request_user(&req);
    server
        .messages
        .submit(user.as_deref(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().finish())
}
