//! 消息处理器（MessageHandler）
//!
//! 处理器声明自己关心的消息：按消息类型（如 `bulletin`、`xml`），
//! 或进一步按主题（如只要 `xml` 中根元素为 `alert` 的子产品）。
//!
use crate::message::Envelope;
use async_trait::async_trait;

/// 处理器的订阅范围
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandledMessageType {
    One(String),
    Many(Vec<String>),
    /// 指定类型且主题一致的消息
    Subject {
        message_type: String,
        subject: String,
    },
    All,
}

impl HandledMessageType {
    pub fn subject(message_type: impl Into<String>, subject: impl Into<String>) -> Self {
        HandledMessageType::Subject {
            message_type: message_type.into(),
            subject: subject.into(),
        }
    }

    /// 该订阅范围是否覆盖给定消息
    pub fn matches(&self, message: &Envelope) -> bool {
        match self {
            HandledMessageType::One(t) => t == message.message_type(),
            HandledMessageType::Many(ts) => ts.iter().any(|t| t == message.message_type()),
            HandledMessageType::Subject {
                message_type,
                subject,
            } => {
                message_type == message.message_type() && message.subject() == Some(subject.as_str())
            }
            HandledMessageType::All => true,
        }
    }
}

#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// 处理器名称（用于日志）
    fn handler_name(&self) -> &str;
    fn handled_message_type(&self) -> HandledMessageType;
    /// 处理一条消息；返回的错误只会被分发引擎记录，不会重试
    async fn handle(&self, message: &Envelope) -> anyhow::Result<()>;
}
