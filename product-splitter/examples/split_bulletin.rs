/// 拆分阶段（内存总线）示例
/// 展示 Bus -> SplitterHandler -> Bus -> 子产品订阅者 的闭环
use anyhow::Result as AnyResult;
use product_splitter::eventing::{
    BusPublisher, DispatchEngine, HandledMessageType, InMemoryMessageBus, MessageBus,
    MessageHandler, SplitterHandler,
};
use product_splitter::{Envelope, SplitterConfig, SplitterStage, TracingLogger, XmlProductExtractor};
use std::{sync::Arc, time::Duration};

// ============================================================================
// 示例处理器：打印拆分出的子产品
// ============================================================================

struct PrintHandler;

#[async_trait::async_trait]
impl MessageHandler for PrintHandler {
    fn handler_name(&self) -> &str {
        "printer"
    }

    fn handled_message_type(&self) -> HandledMessageType {
        HandledMessageType::One("xml".to_string())
    }

    async fn handle(&self, message: &Envelope) -> AnyResult<()> {
        println!(
            "subject={} id={} parent={} bytes={}",
            message.subject().unwrap_or("-"),
            message.message_id(),
            message.parent_id().unwrap_or("-"),
            message.body().len()
        );
        Ok(())
    }
}

const BULLETIN: &str = "\
WUUS53 KOAX 191200
SVROAX

<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<alert xmlns=\"urn:oasis:names:tc:emergency:cap:1.2\">
  <identifier>KOAX-1</identifier>
  <event>Severe Thunderstorm Warning</event>
</alert>
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<alert xmlns=\"urn:oasis:names:tc:emergency:cap:1.2\">
  <identifier>KOAX-2</identifier>
  <event>Tornado Warning</event>
</alert>
<?xml version=\"1.0\"?>
<dwml version=\"1.0\"><head/><data/></dwml>
$$
";

#[tokio::main(flavor = "multi_thread")]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== 产品拆分（内存版）示例 ===\n");
    let bus = Arc::new(InMemoryMessageBus::new(1024));

    let stage = Arc::new(
        SplitterStage::builder()
            .extractor(Arc::new(XmlProductExtractor::new()))
            .logger(Arc::new(TracingLogger))
            .config(SplitterConfig {
                publish_concurrency: 4,
                ..Default::default()
            })
            .build(),
    );

    let handlers: Vec<Arc<dyn MessageHandler>> = vec![
        Arc::new(SplitterHandler::new(
            stage,
            Arc::new(BusPublisher::new(bus.clone())),
            HandledMessageType::One("bulletin".to_string()),
        )),
        Arc::new(PrintHandler),
    ];

    let engine = Arc::new(
        DispatchEngine::builder()
            .message_bus(bus.clone())
            .message_handlers(handlers)
            .build(),
    );

    let handle = engine.start().await;
    println!("✅ 引擎已启动");

    bus.publish(&Envelope::new("bulletin", BULLETIN)).await?;
    bus.publish(&Envelope::new("bulletin", "FXUS63 KDMX\nNO XML HERE\n$$")).await?;
    println!("✅ 已发布 2 条公报");

    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.shutdown();
    handle.join().await;
    println!("\n✅ 优雅关闭完成");
    Ok(())
}
