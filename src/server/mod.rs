//! 服务装配与启动 / Service wiring and startup

use std::sync::Arc;

use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::conf::{ChatConfig, ServerConfig, VisibilityConfig};
use crate::service::{MessageService, MessageVisibilityFilter, PresenceTracker};
use crate::storage::{self, SharedStore};
use crate::tasks::ReaperScheduler;

/// 服务端共享状态 / Shared server state
///
/// 各组件共用同一个存储句柄，自身不保存状态
/// Every component shares one store handle and keeps no state of its own
pub struct ChatServer {
    pub presence: PresenceTracker,
    pub visibility: MessageVisibilityFilter,
    pub messages: MessageService,
}

impl ChatServer {
    pub fn new(store: SharedStore, visibility: VisibilityConfig) -> Self {
        Self {
            presence: PresenceTracker::new(store.clone()),
            visibility: MessageVisibilityFilter::new(store.clone(), visibility),
            messages: MessageService::new(store),
        }
    }
}

/// 允许任意来源跨域访问 / Allow cross-origin requests from anywhere
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Headers", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
}

/// 应用启动器 / Application bootstrap
pub struct ChatApp {
    config: ChatConfig,
}

impl ChatApp {
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }

    /// 打开存储、启动清理任务并运行 HTTP 服务，HTTP 服务退出后停止清理任务
    /// Open the store, start the reaper and serve HTTP; the reaper is stopped
    /// once the HTTP server returns
    pub async fn run(self) -> Result<()> {
        let store = storage::open(&self.config.store).await?;
        let server = Arc::new(ChatServer::new(store, self.config.visibility.clone()));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let reaper = ReaperScheduler::new(server.presence.clone(), &self.config.reaper)
            .spawn(shutdown_rx);

        let result = start_http_server(server, &self.config.server).await;

        shutdown_tx.send(true).ok();
        if let Err(e) = reaper.await {
            warn!("reaper task ended abnormally: {}", e);
        }
        info!("✅ Server shutdown successfully");
        result
    }
}

/// 启动HTTP服务器 / Start HTTP server
async fn start_http_server(server: Arc<ChatServer>, cfg: &ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", cfg.host, cfg.port);

    let mut http = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(Logger::default())
            .app_data(web::Data::new(server.clone()))
            .configure(crate::router::configure)
    });
    if let Some(workers) = cfg.workers {
        http = http.workers(workers);
    }

    info!("🌐 HTTP server starting on http://{}", addr);
    info!("   GET  /participants   POST /participants");
    info!("   GET  /messages       POST /messages");
    info!("   POST /status");
    http.bind(addr)?.run().await?;
    Ok(())
}
