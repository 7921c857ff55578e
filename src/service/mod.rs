//! 业务服务 / Core services

pub mod messages;
pub mod presence;
pub mod visibility;

pub use messages::{MessageDraft, MessageService};
pub use presence::{PresenceTracker, ReapFailure, SweepReport};
pub use visibility::{parse_limit, MessageVisibilityFilter};
