//! 内存版消息总线（InMemoryMessageBus）
//!
//! 基于 `tokio::sync::broadcast` 实现的轻量总线，满足 `MessageBus` 协议：
//! - `publish`：克隆并广播消息；
//! - `subscribe`：返回 `'static` 生命周期消息流；
//! - 典型用途：测试环境、示例与本地开发。
//!
//! 注意：无订阅者时发送的消息会被丢弃；落后的订阅者会收到 `EventBus` 错误（Lagged）。

use crate::error::{SplitterError, SplitterResult as Result};
use crate::eventing::MessageBus;
use crate::message::Envelope;
use async_trait::async_trait;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// 简单的内存消息总线实现
#[derive(Clone)]
pub struct InMemoryMessageBus {
    tx: broadcast::Sender<Envelope>,
}

impl InMemoryMessageBus {
    /// 创建一个内存总线，`capacity` 为广播缓冲区容量（至少为 1）
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn publish(&self, message: &Envelope) -> Result<()> {
        // 若当前无订阅者，broadcast 的 send 会返回错误，这里视为非致命并忽略
        if self.tx.send(message.clone()).is_err() {
            tracing::debug!(message_id = %message.message_id(), "no subscribers, message dropped");
        }
        Ok(())
    }

    async fn subscribe(&self) -> BoxStream<'static, Result<Envelope>> {
        let rx = self.tx.subscribe();
        let stream =
            BroadcastStream::new(rx).map(|r| r.map_err(|e| SplitterError::event_bus(e.to_string())));
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_messages() {
        let bus = InMemoryMessageBus::new(16);
        let mut stream = bus.subscribe().await;
        assert_eq!(bus.subscriber_count(), 1);

        let batch = vec![Envelope::new("bulletin", "a"), Envelope::new("bulletin", "b")];
        bus.publish_batch(&batch).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(first.body(), "a");
        assert_eq!(second.body(), "b");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let bus = InMemoryMessageBus::new(0);
        assert!(bus.publish(&Envelope::new("bulletin", "lost")).await.is_ok());
    }

    #[tokio::test]
    async fn lagging_subscriber_sees_bus_error() {
        let bus = InMemoryMessageBus::new(1);
        let mut stream = bus.subscribe().await;

        bus.publish(&Envelope::new("bulletin", "1")).await.unwrap();
        bus.publish(&Envelope::new("bulletin", "2")).await.unwrap();

        let lagged = stream.next().await.unwrap();
        assert!(matches!(lagged, Err(SplitterError::EventBus { .. })));
        let next = stream.next().await.unwrap().unwrap();
        assert_eq!(next.body(), "2");
    }
}
