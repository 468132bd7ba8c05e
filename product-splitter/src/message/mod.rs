//! 消息模型
//!
//! - `InboundMessage`：从产品流接收的原始文本公报；
//! - `SubMessage`：从公报中抽取出的独立子产品；
//! - `Envelope`：总线上传输的统一形态，两者都可与之互相转换。
//!
mod envelope;
mod inbound;
mod sub_message;

pub use envelope::Envelope;
pub use inbound::InboundMessage;
pub use sub_message::SubMessage;
