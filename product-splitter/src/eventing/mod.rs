//! 事件子系统（eventing）
//!
//! 提供把拆分阶段接入发布/订阅管道所需的最小运行时：
//! - `MessageBus`：统一发布/订阅接口；
//! - `InMemoryMessageBus`：基于 broadcast 的内存总线；
//! - `BusPublisher`：把任意总线适配为拆分阶段所需的 `Publisher`；
//! - `MessageHandler`：对总线消息进行消费处理；
//! - `SplitterHandler`：以处理器形式挂载拆分阶段；
//! - `DispatchEngine`：订阅总线并按处理器匹配并发分发。
//!
//! 该模块不绑定具体传输实现，可对接任意消息系统。
//!
pub mod bus;
pub mod bus_inmemory;
pub mod engine;
pub mod handler;
pub mod publisher;
pub mod splitter_handler;

pub use bus::MessageBus;
pub use bus_inmemory::InMemoryMessageBus;
pub use engine::{DispatchConfig, DispatchEngine, EngineHandle};
pub use handler::{HandledMessageType, MessageHandler};
pub use publisher::BusPublisher;
pub use splitter_handler::SplitterHandler;
