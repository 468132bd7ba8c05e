//! 以 `MessageHandler` 形式挂载拆分阶段
//!
use super::{HandledMessageType, MessageHandler};
use crate::message::{Envelope, InboundMessage};
use crate::publisher::Publisher;
use crate::splitter::SplitterStage;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SplitterHandler {
    name: String,
    handled: HandledMessageType,
    stage: Arc<SplitterStage>,
    publisher: Arc<dyn Publisher>,
}

impl SplitterHandler {
    pub fn new(
        stage: Arc<SplitterStage>,
        publisher: Arc<dyn Publisher>,
        handled: HandledMessageType,
    ) -> Self {
        Self {
            name: stage.config().component_name.clone(),
            handled,
            stage,
            publisher,
        }
    }
}

#[async_trait]
impl MessageHandler for SplitterHandler {
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn handled_message_type(&self) -> HandledMessageType {
        self.handled.clone()
    }

    async fn handle(&self, message: &Envelope) -> anyhow::Result<()> {
        // 派生出的子消息不再拆分，避免订阅 All 时处理自身输出
        if message.parent_id().is_some() {
            return Ok(());
        }

        let inbound = InboundMessage::from(message);
        self.stage.handle(&inbound, self.publisher.as_ref()).await;
        Ok(())
    }
}
