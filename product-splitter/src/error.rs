//! 统一错误定义
//!
//! - `SplitterError`：总线、发布与序列化等基础设施错误，可用 `?` 传播；
//! - `StageFailure`：拆分阶段在边界处吸收的失败，仅作为数据返回并记录日志，
//!   不会向调用方（总线分发循环）传播。
//!
use thiserror::Error;

/// 基础设施错误（最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SplitterError {
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("event bus error: {reason}")]
    EventBus { reason: String },
    #[error("publish error: message={message_id}, reason={reason}")]
    Publish { message_id: String, reason: String },
}

impl SplitterError {
    pub fn event_bus(reason: impl Into<String>) -> Self {
        SplitterError::EventBus {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type SplitterResult<T> = Result<T, SplitterError>;

/// 拆分阶段吸收的失败分类
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageFailure {
    #[error("extraction failed: message={message_id}, reason={reason}")]
    Extraction { message_id: String, reason: String },
    #[error("extractor panicked: message={message_id}, reason={reason}")]
    ExtractorPanicked { message_id: String, reason: String },
    #[error("publish failed: message={message_id}, sub_message={sub_message_id}, reason={reason}")]
    Publish {
        message_id: String,
        sub_message_id: String,
        reason: String,
    },
    #[error(
        "publisher panicked: message={message_id}, sub_message={sub_message_id}, reason={reason}"
    )]
    PublisherPanicked {
        message_id: String,
        sub_message_id: String,
        reason: String,
    },
}

impl StageFailure {
    /// 失败所属的入站消息 ID
    pub fn message_id(&self) -> &str {
        match self {
            StageFailure::Extraction { message_id, .. }
            | StageFailure::ExtractorPanicked { message_id, .. }
            | StageFailure::Publish { message_id, .. }
            | StageFailure::PublisherPanicked { message_id, .. } => message_id,
        }
    }

    /// 是否发生在抽取阶段（此时没有任何子消息被发布）
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            StageFailure::Extraction { .. } | StageFailure::ExtractorPanicked { .. }
        )
    }
}

/// 从 panic 载荷中取出可读信息
pub(crate) fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
