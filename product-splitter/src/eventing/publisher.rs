use crate::error::SplitterResult as Result;
use crate::eventing::MessageBus;
use crate::message::{Envelope, SubMessage};
use crate::publisher::Publisher;
use async_trait::async_trait;
use std::sync::Arc;

/// 将子消息包装为 `Envelope` 后发布到总线
#[derive(Clone)]
pub struct BusPublisher {
    bus: Arc<dyn MessageBus>,
}

impl BusPublisher {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl Publisher for BusPublisher {
    async fn publish(&self, message: &SubMessage) -> Result<()> {
        self.bus.publish(&Envelope::from(message)).await
    }
}
