use super::SplitterConfig;
use crate::error::{StageFailure, panic_reason};
use crate::extract::Extractor;
use crate::message::{InboundMessage, SubMessage};
use crate::observe::{StageLogger, TracingLogger};
use crate::publisher::Publisher;
use bon::Builder;
use futures_util::{FutureExt, StreamExt, stream};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

fn default_logger() -> Arc<dyn StageLogger> {
    Arc::new(TracingLogger)
}

/// SplitterStage：
/// - 以注入的抽取器拆出子消息
/// - 有界并发地把每条子消息发布一次
/// - 抽取或发布中的 `Err`/panic 都在此处吸收，结果以 `SplitOutcome` 返回
#[derive(Builder)]
pub struct SplitterStage {
    extractor: Arc<dyn Extractor>,
    #[builder(default = default_logger())]
    logger: Arc<dyn StageLogger>,
    #[builder(default)]
    config: SplitterConfig,
}

impl SplitterStage {
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// 处理一条入站消息；永不返回错误，也不会把 panic 传给调用方
    pub async fn handle(&self, message: &InboundMessage, publisher: &dyn Publisher) -> SplitOutcome {
        let component = self.config.component_name.as_str();

        let items = match self.extract(message) {
            Ok(items) => items,
            Err(failure) => {
                self.logger.error(component, &failure.to_string());
                return SplitOutcome::failed(failure);
            }
        };

        if items.is_empty() {
            return SplitOutcome::default();
        }

        self.logger.info(
            component,
            &format!(
                "Splitting product into {} {}",
                items.len(),
                self.config.item_label
            ),
        );

        // 单条失败不影响其余子消息的发布。
        // 发布 future 先收集再入流：流类型里不能带借用参数的闭包，否则外层 future 不满足 Send
        let submissions: Vec<_> = items
            .iter()
            .map(|item| Self::publish_one(publisher, message.id(), item))
            .collect();
        let failures: Vec<StageFailure> = stream::iter(submissions)
            .buffer_unordered(self.config.effective_concurrency())
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        for failure in &failures {
            self.logger.error(component, &failure.to_string());
        }

        let outcome = SplitOutcome {
            extracted: items.len(),
            published: items.len() - failures.len(),
            failures,
        };
        tracing::debug!(
            message_id = %message.id(),
            extracted = outcome.extracted,
            published = outcome.published,
            "product split finished"
        );
        outcome
    }

    fn extract(&self, message: &InboundMessage) -> Result<Vec<SubMessage>, StageFailure> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.extractor.extract(message))) {
            Ok(Ok(items)) => Ok(items),
            Ok(Err(err)) => Err(StageFailure::Extraction {
                message_id: message.id().to_string(),
                reason: format!("{err:#}"),
            }),
            Err(payload) => Err(StageFailure::ExtractorPanicked {
                message_id: message.id().to_string(),
                reason: panic_reason(payload.as_ref()),
            }),
        }
    }

    async fn publish_one(
        publisher: &dyn Publisher,
        message_id: &str,
        item: &SubMessage,
    ) -> Result<(), StageFailure> {
        match AssertUnwindSafe(publisher.publish(item)).catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(StageFailure::Publish {
                message_id: message_id.to_string(),
                sub_message_id: item.id().to_string(),
                reason: err.to_string(),
            }),
            Err(payload) => Err(StageFailure::PublisherPanicked {
                message_id: message_id.to_string(),
                sub_message_id: item.id().to_string(),
                reason: panic_reason(payload.as_ref()),
            }),
        }
    }
}

/// 单次处理的结果
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    extracted: usize,
    published: usize,
    failures: Vec<StageFailure>,
}

impl SplitOutcome {
    fn failed(failure: StageFailure) -> Self {
        Self {
            extracted: 0,
            published: 0,
            failures: vec![failure],
        }
    }

    /// 抽取出的子消息数
    pub fn extracted(&self) -> usize {
        self.extracted
    }

    /// 成功提交发布的子消息数
    pub fn published(&self) -> usize {
        self.published
    }

    pub fn failures(&self) -> &[StageFailure] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
