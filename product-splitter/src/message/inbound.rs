use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 入站公报：接收后不可变
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundMessage {
    /// 消息 ID
    id: String,
    /// 产品类型
    product_type: String,
    /// 接收时间
    #[builder(default = Utc::now())]
    received_at: DateTime<Utc>,
    /// 原始文本
    text: String,
}

impl InboundMessage {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
