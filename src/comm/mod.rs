//! 通用模块：配置、日志与时间工具
//! Common module: configuration, logging and time helpers

pub mod config;
pub mod time;
pub mod tracing;

pub use self::config::{ConfigManager, ConfigSource};
pub use self::time::{clock_label, now_millis};
