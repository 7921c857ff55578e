use actix_web::http::Method;
use actix_web::{web, HttpResponse};

use crate::error::AppError;

/// 路由配置 / Route configuration
///
/// 同一路径可注册多次，按 HTTP 方法守卫分派
/// A path may be registered more than once; dispatch is by method guard
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    crate::api::participants::list::register(cfg, "/participants");
    crate::api::participants::create::register(cfg, "/participants");
    crate::api::messages::list::register(cfg, "/messages");
    crate::api::messages::send::register(cfg, "/messages");
    crate::api::status::heartbeat::register(cfg, "/status");

    cfg.route("/{tail:.*}", web::method(Method::OPTIONS).to(preflight_ok));
}

/// 请求体无法解析时按验证错误（422）处理
/// Unparseable bodies are validation failures (422)
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation("body", err.to_string()).into())
}

// 处理CORS预检请求（全路径匹配）/ Handle CORS preflight for all paths
async fn preflight_ok() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
