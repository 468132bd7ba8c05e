//! 阶段日志（StageLogger）
//!
//! 拆分阶段的可观测输出通过注入的日志能力发出，而非进程级全局单例，
//! 便于在测试中以捕获型实现断言日志内容。
//!
use std::sync::Mutex;

/// 日志级别
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// 阶段日志能力：接收 `(组件名, 消息)`，调用即返回，不会失败
pub trait StageLogger: Send + Sync {
    fn info(&self, component: &str, message: &str);
    fn error(&self, component: &str, message: &str);
}

/// 转发到 `tracing` 的默认实现
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl StageLogger for TracingLogger {
    fn info(&self, component: &str, message: &str) {
        tracing::info!(component, "{message}");
    }

    fn error(&self, component: &str, message: &str) {
        tracing::error!(component, "{message}");
    }
}

/// 一条被捕获的日志
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub component: String,
    pub message: String,
}

/// 内存捕获实现，用于测试与示例
#[derive(Debug, Default)]
pub struct CapturingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已捕获日志的快照
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.lock().iter().filter(|e| e.level == level).count()
    }

    fn push(&self, level: LogLevel, component: &str, message: &str) {
        self.lock().push(LogEntry {
            level,
            component: component.to_string(),
            message: message.to_string(),
        });
    }

    // 日志调用不得失败：锁中毒时沿用内部数据
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StageLogger for CapturingLogger {
    fn info(&self, component: &str, message: &str) {
        self.push(LogLevel::Info, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        self.push(LogLevel::Error, component, message);
    }
}
