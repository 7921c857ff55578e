//! HTTP 接口 / HTTP handlers
//!
//! 每个文件一个处理函数，并提供 `register(cfg, path)` 注册入口
//! One handler per file, each exposing a `register(cfg, path)` entry point

pub mod identity;
pub mod messages;
pub mod participants;
pub mod status;
