use anyhow::Result;
use chrono::{Datelike, Timelike};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::conf::{LogFormat, LoggingConfig};

struct LogTimer;

impl fmt::time::FormatTime for LogTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        let cs = now.timestamp_subsec_millis() / 10;
        let s = format!(
            "{:04}-{:02}-{:02}:{:02}:{:02}:{:02}:{:02}",
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            cs
        );
        w.write_str(&s)
    }
}

/// 构建日志过滤器：`RUST_LOG` 优先，其次配置的级别
/// Build the filter: `RUST_LOG` first, configured level otherwise
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{},sqlx=warn", level)))
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"))
}

/// 初始化全局日志订阅器 / Install the global tracing subscriber
///
/// 重复调用是安全的，后续调用不会覆盖已安装的订阅器
/// Calling twice is harmless; later calls keep the first subscriber
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    // actix-web 与 sqlx 通过 log 输出，桥接到 tracing
    // actix-web and sqlx emit `log` records; bridge them into tracing
    LogTracer::init().ok();

    let filter = build_filter(&logging.level);
    match logging.format {
        LogFormat::Compact => {
            fmt::SubscriberBuilder::default()
                .with_env_filter(filter)
                .with_timer(LogTimer)
                .compact()
                .with_target(false)
                .try_init()
                .ok();
        }
        LogFormat::Json => {
            let formatting_layer = BunyanFormattingLayer::new("v-chat".into(), std::io::stdout);
            let subscriber = Registry::default()
                .with(filter)
                .with(JsonStorageLayer)
                .with(formatting_layer);
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }
    Ok(())
}
