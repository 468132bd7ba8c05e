//! 产品拆分库（product-splitter）
//!
//! 在发布/订阅管道中实现一个扇出拆分阶段：
//! - 从入站文本公报中抽取内嵌的结构化子产品（`extract`），默认识别 XML 子产品；
//! - 以有界并发把每个子产品作为独立消息重新发布（`splitter`）；
//! - 抽取或发布失败在阶段边界处吸收、分类并记录（`error`、`observe`）；
//! - 事件系统（`eventing`）：总线、分发引擎与处理器适配，默认开启。
//!
//! 典型用法：
//! 1. 选择抽取器（如 `XmlProductExtractor`）并构建 `SplitterStage`；
//! 2. 用 `SplitterHandler` 把阶段挂到 `DispatchEngine` 上；
//! 3. 订阅总线上的子产品类型即可收到拆分结果。
//!
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod extract;
pub mod message;
pub mod observe;
pub mod publisher;
pub mod splitter;

pub use error::{SplitterError, SplitterResult, StageFailure};
pub use extract::{Extractor, XmlProductExtractor};
pub use message::{Envelope, InboundMessage, SubMessage};
pub use observe::{CapturingLogger, StageLogger, TracingLogger};
pub use publisher::Publisher;
pub use splitter::{SplitOutcome, SplitterConfig, SplitterStage};
