//! 总线消息（Envelope）
//!
//! 定义消息在总线上的标准形态，以及与 `InboundMessage`/`SubMessage` 之间的转换。
//!
use super::{InboundMessage, SubMessage};
use crate::error::SplitterResult;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    /// 消息唯一标识符
    message_id: String,
    /// 消息类型，用于订阅路由
    message_type: String,
    /// 派生来源的消息 ID（拆分产生的子消息才有）
    parent_id: Option<String>,
    /// 主题（如子产品的根元素名）
    subject: Option<String>,
    /// 消息产生时间
    occurred_at: DateTime<Utc>,
    /// 消息正文
    body: String,
}

impl Envelope {
    /// 以随机 ID 与当前时间创建一条原始消息
    pub fn new(message_type: impl Into<String>, body: impl Into<String>) -> Self {
        Envelope {
            message_id: uuid::Uuid::new_v4().to_string(),
            message_type: message_type.into(),
            parent_id: None,
            subject: None,
            occurred_at: Utc::now(),
            body: body.into(),
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// 编码为外部传输使用的 JSON 文本
    pub fn to_json(&self) -> SplitterResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从外部传输收到的 JSON 文本解码
    pub fn from_json(raw: &str) -> SplitterResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl From<&Envelope> for InboundMessage {
    fn from(envelope: &Envelope) -> Self {
        InboundMessage::builder()
            .id(envelope.message_id.clone())
            .product_type(envelope.message_type.clone())
            .received_at(envelope.occurred_at)
            .text(envelope.body.clone())
            .build()
    }
}

impl From<&SubMessage> for Envelope {
    fn from(sub: &SubMessage) -> Self {
        Envelope {
            message_id: sub.id().to_string(),
            message_type: sub.kind().to_string(),
            parent_id: Some(sub.parent_id().to_string()),
            subject: Some(sub.name().to_string()),
            occurred_at: Utc::now(),
            body: sub.content().to_string(),
        }
    }
}
