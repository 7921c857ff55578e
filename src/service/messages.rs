use serde::Deserialize;
use tracing::debug;

use crate::domain::{Message, MessageType, NewMessage};
use crate::error::{AppError, AppResult};
use crate::storage::SharedStore;

/// 消息草稿（请求体）/ Message draft as posted by a participant
///
/// 字段全部可选，缺失与空白在 [`MessageService::submit`] 中统一校验
/// Every field is optional; missing and blank values are validated in
/// [`MessageService::submit`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDraft {
    pub to: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub msg_type: Option<String>,
}

fn required(field: &str, value: Option<&str>) -> AppResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        Some(_) => Err(AppError::validation(field, "must not be empty")),
        None => Err(AppError::validation(field, "is required")),
    }
}

/// 消息提交 / Message submission
#[derive(Clone)]
pub struct MessageService {
    store: SharedStore,
}

impl MessageService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 校验并写入一条消息 / Validate and store one message
    ///
    /// 发送者由请求头确定，必须是在线参与者；否则同样是验证错误
    /// The sender comes from the request header and must be an active
    /// participant; otherwise it is a validation error as well
    pub async fn submit(&self, from: Option<&str>, draft: MessageDraft) -> AppResult<Message> {
        let to = required("to", draft.to.as_deref())?;
        let text = required("text", draft.text.as_deref())?;
        let raw_type = required("type", draft.msg_type.as_deref())?;
        let msg_type = raw_type
            .parse::<MessageType>()
            .ok()
            .filter(MessageType::is_submittable)
            .ok_or_else(|| {
                AppError::validation("type", "must be message or private_message")
            })?;

        let from = required("user", from)?;
        if self.store.find_participant(&from).await?.is_none() {
            return Err(AppError::validation(
                "user",
                format!("{} is not an active participant", from),
            ));
        }

        let stored = self
            .store
            .insert_message(NewMessage::new(from, to, text, msg_type))
            .await?;
        debug!(
            "✉️ message #{} {} -> {} ({})",
            stored.id, stored.from, stored.to, stored.msg_type
        );
        Ok(stored)
    }
}
