use serde::{Deserialize, Serialize};

use crate::comm::clock_label;

/// 广播收件人 / Broadcast recipient sentinel
pub const EVERYONE: &str = "Todos";
/// 进入房间提示 / Join notice text
pub const JOIN_TEXT: &str = "entra na sala...";
/// 离开房间提示 / Leave notice text
pub const LEAVE_TEXT: &str = "sai da sala...";

/// 消息类型 / Message type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// 公开消息 / Public message
    Message,
    /// 私聊，仅收发双方可见 / Private, visible to sender and recipient only
    PrivateMessage,
    /// 系统进出提示，总是广播 / System join/leave notice, always broadcast
    Status,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Message => "message",
            MessageType::PrivateMessage => "private_message",
            MessageType::Status => "status",
        }
    }

    /// 参与者可以直接发送的类型（`status` 仅由系统产生）
    pub fn is_submittable(&self) -> bool {
        matches!(self, MessageType::Message | MessageType::PrivateMessage)
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageType::Message),
            "private_message" => Ok(MessageType::PrivateMessage),
            "status" => Ok(MessageType::Status),
            other => Err(format!("unknown message type: {}", other)),
        }
    }
}

/// 已存储的消息，`id` 由存储分配且单调递增
/// A stored message; `id` is store-assigned and monotonically increasing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub time: String,
}

/// 待写入的消息 / Message about to be inserted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
    pub from: String,
    pub to: String,
    pub text: String,
    pub msg_type: MessageType,
    pub time: String,
}

impl NewMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
        msg_type: MessageType,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            text: text.into(),
            msg_type,
            time: clock_label(),
        }
    }

    /// 系统进出提示，发往所有人
    pub fn status(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, EVERYONE, text, MessageType::Status)
    }

    pub fn into_stored(self, id: i64) -> Message {
        Message {
            id,
            from: self.from,
            to: self.to,
            text: self.text,
            msg_type: self.msg_type,
            time: self.time,
        }
    }
}
