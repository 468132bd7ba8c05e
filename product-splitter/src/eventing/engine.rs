//! 分发引擎（DispatchEngine）
//!
//! 订阅总线消息流，按处理器订阅的消息类型匹配，并以有界并发分发处理；
//! 处理器失败与总线落后只记录日志，循环持续运行直到关闭。
//! 提供关闭与等待的 `EngineHandle`。
//!
use super::handler::HandledMessageType;
use super::{MessageBus, MessageHandler};
use crate::error::SplitterResult;
use crate::message::Envelope;
use bon::Builder;
use futures_core::stream::BoxStream;
use futures_util::{StreamExt, stream};
use std::{collections::HashMap, sync::Arc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// 导入由 bon::Builder 生成的 typestate 模块与状态转换别名
use self::dispatch_engine_builder::{IsUnset, SetRegistry, State as BuilderState};

/// DispatchEngine：
/// - 订阅 Bus 的消息流
/// - 分发到匹配的 Handler，并发处理
#[derive(Builder)]
pub struct DispatchEngine {
    message_bus: Arc<dyn MessageBus>,
    #[builder(setters(vis = "pub(crate)"))]
    registry: HandlerRegistry,
    #[builder(default)]
    config: DispatchConfig,
}

impl<S: BuilderState> DispatchEngineBuilder<S> {
    pub fn message_handlers(
        self,
        handlers: Vec<Arc<dyn MessageHandler>>,
    ) -> DispatchEngineBuilder<SetRegistry<S>>
    where
        <S as BuilderState>::Registry: IsUnset,
    {
        self.registry(HandlerRegistry::new(handlers))
    }
}

impl DispatchEngine {
    /// 启动分发引擎，返回可用于关闭/等待的句柄
    ///
    /// 订阅在返回前完成，调用方随后发布的消息不会丢失。
    pub async fn start(self: Arc<Self>) -> EngineHandle {
        let token = CancellationToken::new();
        let stream = self.message_bus.subscribe().await;
        let task = tokio::spawn(Self::subscribe_loop(self.clone(), stream, token.clone()));

        EngineHandle {
            token,
            tasks: vec![task],
        }
    }

    async fn subscribe_loop(
        self: Arc<Self>,
        mut stream: BoxStream<'static, SplitterResult<Envelope>>,
        token: CancellationToken,
    ) {
        let registry = self.registry.clone();
        let concurrency = self.config.handler_concurrency.max(1);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    break;
                }
                maybe_message = stream.next() => {
                    match maybe_message {
                        Some(Ok(message)) => {
                            let merged = registry.matching(&message);
                            if merged.is_empty() { continue; }

                            stream::iter(merged)
                                .for_each_concurrent(Some(concurrency), |h| {
                                    let message = &message;
                                    async move {
                                        if let Err(err) = h.handle(message).await {
                                            tracing::warn!(
                                                handler = h.handler_name(),
                                                message_id = %message.message_id(),
                                                error = %format!("{err:#}"),
                                                "message handler failed"
                                            );
                                        }
                                    }
                                })
                                .await;
                        }
                        Some(Err(err)) => {
                            // 总线落后等错误不终止循环，继续处理下一条消息
                            tracing::warn!(error = %err, "message bus stream error");
                        }
                        None => {
                            break;
                        }
                    }
                }
            }
        }
    }
}

// 自定义 Builder 方法：接收 handlers，内部转换为 HandlerRegistry 并设置到 builder 的 registry 字段。
// 受 typestate 限制，仅当 `registry` 尚未设置时可调用。

/// 处理器路由表：公报按类型路由，子产品还可按（类型, 主题）路由
#[derive(Clone, Default)]
struct HandlerRegistry {
    by_type: HashMap<String, Vec<Arc<dyn MessageHandler>>>,
    by_subject: HashMap<(String, String), Vec<Arc<dyn MessageHandler>>>,
    all: Vec<Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    fn new(handlers: Vec<Arc<dyn MessageHandler>>) -> Self {
        let mut registry = Self::default();

        for h in handlers {
            match h.handled_message_type() {
                HandledMessageType::All => registry.all.push(h),
                HandledMessageType::One(t) => {
                    registry.by_type.entry(t).or_default().push(h);
                }
                HandledMessageType::Many(ts) => {
                    for t in ts {
                        registry.by_type.entry(t).or_default().push(h.clone());
                    }
                }
                HandledMessageType::Subject {
                    message_type,
                    subject,
                } => {
                    registry
                        .by_subject
                        .entry((message_type, subject))
                        .or_default()
                        .push(h);
                }
            }
        }

        registry
    }

    fn matching(&self, message: &Envelope) -> Vec<Arc<dyn MessageHandler>> {
        let mut merged: Vec<Arc<dyn MessageHandler>> = Vec::new();
        if let Some(list) = self.by_type.get(message.message_type()) {
            merged.extend(list.iter().cloned());
        }
        if let Some(subject) = message.subject() {
            let key = (message.message_type().to_string(), subject.to_string());
            if let Some(list) = self.by_subject.get(&key) {
                merged.extend(list.iter().cloned());
            }
        }
        merged.extend(self.all.iter().cloned());
        merged
    }
}

/// 分发引擎配置
#[derive(Clone, Copy, Debug)]
pub struct DispatchConfig {
    /// 单条消息的处理并发（同一消息广播给多个 handler）
    pub handler_concurrency: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            handler_concurrency: 8,
        }
    }
}

/// 引擎运行句柄：用于优雅关闭与等待任务结束
pub struct EngineHandle {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub async fn join(mut self) {
        let tasks = std::mem::take(&mut self.tasks);

        for t in tasks {
            let _ = t.await;
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
