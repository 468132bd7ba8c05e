//! 子产品抽取（Extractor）
//!
//! 抽取是对入站公报的纯函数变换：不产生副作用，结果为有序、可能为空的子消息序列。
//! 结构缺失不是错误，应返回空序列；`Err` 仅用于实现方确实无法完成抽取的情况，
//! 由拆分阶段在边界处分类记录。
//!
mod xml;

pub use xml::XmlProductExtractor;

use crate::message::{InboundMessage, SubMessage};

/// 抽取器：从一条入站消息中抽出零个或多个子消息
pub trait Extractor: Send + Sync {
    fn extract(&self, message: &InboundMessage) -> anyhow::Result<Vec<SubMessage>>;
}

impl<F> Extractor for F
where
    F: Fn(&InboundMessage) -> anyhow::Result<Vec<SubMessage>> + Send + Sync,
{
    fn extract(&self, message: &InboundMessage) -> anyhow::Result<Vec<SubMessage>> {
        self(message)
    }
}
