use crate::domain::{Message, MessageType, EVERYONE};

/// 消息读取者范围 / Who is reading the messages
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Audience {
    /// 请求者身份，`None` 表示匿名，仅能看到广播
    /// Requesting identity; `None` is anonymous and only sees broadcasts
    pub requester: Option<String>,
    /// 额外放行全部 `message` 类型 / Also admit every `message`-typed record
    pub public_type_visible: bool,
}

impl Audience {
    pub fn new(requester: Option<String>, public_type_visible: bool) -> Self {
        Self {
            requester,
            public_type_visible,
        }
    }

    /// 可见性规则 / Visibility rule
    ///
    /// `to == EVERYONE || from == requester || to == requester`
    pub fn permits(&self, message: &Message) -> bool {
        if message.to == EVERYONE {
            return true;
        }
        if self.public_type_visible && message.msg_type == MessageType::Message {
            return true;
        }
        match self.requester.as_deref() {
            Some(me) => message.from == me || message.to == me,
            None => false,
        }
    }
}

/// 消息查询条件 / Message query
#[derive(Clone, Debug, Default)]
pub struct MessageQuery {
    pub audience: Audience,
    /// 最多返回的条数，`None` 表示不限
    pub limit: Option<usize>,
}
