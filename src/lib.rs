pub mod api;
pub mod cli;
pub mod comm;
pub mod conf;
pub mod domain;
pub mod error;
pub mod router;
pub mod server;
pub mod service;
pub mod storage;
pub mod tasks;

pub use error::{AppError, AppResult};
pub use server::{ChatApp, ChatServer};
