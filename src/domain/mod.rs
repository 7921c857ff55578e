//! 领域模型 / Domain model

pub mod message;
pub mod participant;

pub use message::{Message, MessageType, NewMessage, EVERYONE, JOIN_TEXT, LEAVE_TEXT};
pub use participant::{normalize_name, Participant};
