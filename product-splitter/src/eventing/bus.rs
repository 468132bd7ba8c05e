//! 消息总线（MessageBus）协议
//!
//! 公报与拆分出的子产品共用同一条总线：产品流把公报发布为原始消息，
//! 拆分阶段再把每个子产品作为带 `parent_id` 的派生消息发布回来。
//! 订阅方拿到的是 'static 生命周期的消息流，可直接交给 tokio::spawn 的分发循环。
//!
use crate::{error::SplitterResult as Result, message::Envelope};
use async_trait::async_trait;
use futures_core::stream::BoxStream;

#[async_trait]
pub trait MessageBus: Send + Sync {
    /// 提交一条消息；返回即视为已交给总线，不等待任何订阅方处理
    async fn publish(&self, message: &Envelope) -> Result<()>;

    /// 按顺序提交一组消息（如同一公报的全部子产品），遇到第一个错误即返回
    async fn publish_batch(&self, messages: &[Envelope]) -> Result<()> {
        for message in messages {
            self.publish(message).await?;
        }
        Ok(())
    }

    /// 订阅之后发布的消息；流中的 `Err` 表示总线侧问题（如订阅方落后），不代表流结束
    async fn subscribe(&self) -> BoxStream<'static, Result<Envelope>>;
}
