use serde::{Deserialize, Serialize};

/// 拆分阶段配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// 日志中的组件名
    pub component_name: String,
    /// 计数日志中子产品的称呼
    pub item_label: String,
    /// 子消息发布的最大并发
    pub publish_concurrency: usize,
}

impl SplitterConfig {
    /// 实际生效的并发上限（至少为 1）
    pub fn effective_concurrency(&self) -> usize {
        self.publish_concurrency.max(1)
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            component_name: "ProductSplitter".to_string(),
            item_label: "xml files".to_string(),
            publish_concurrency: 8,
        }
    }
}
