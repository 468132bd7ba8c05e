//! 拆分阶段（SplitterStage）
//!
//! 抽取入站公报中的子产品，并以有界并发逐条重新发布到总线。
//! 阶段本身无状态，任何失败都在边界处吸收并记录，不会中断调用方的分发循环。
//!
mod config;
mod stage;

pub use config::SplitterConfig;
pub use stage::{SplitOutcome, SplitterStage};
