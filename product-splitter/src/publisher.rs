//! 发布能力（Publisher）
//!
//! 拆分阶段仅依赖“把一条子消息交给总线”这一能力；总线本身由外部基础设施持有。
//!
use crate::{error::SplitterResult as Result, message::SubMessage};
use async_trait::async_trait;

/// 发布者：将子消息提交给总线，返回即视为提交完成（不等待下游处理）
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, message: &SubMessage) -> Result<()>;
}
