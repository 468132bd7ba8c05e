use bon::Builder;
use serde::{Deserialize, Serialize};

/// 从公报中抽取出的子产品，可被下游独立处理
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubMessage {
    /// 子消息 ID
    id: String,
    /// 来源公报 ID
    parent_id: String,
    /// 子产品类型（如 `xml`）
    kind: String,
    /// 子产品名称（如根元素名）
    name: String,
    /// 在公报中的顺序位置，从 0 开始
    index: usize,
    /// 子产品内容
    content: String,
}

impl SubMessage {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
