#![cfg(feature = "eventing")]

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use product_splitter::eventing::{
    BusPublisher, DispatchConfig, DispatchEngine, HandledMessageType, InMemoryMessageBus,
    MessageBus, MessageHandler, SplitterHandler,
};
use product_splitter::observe::LogLevel;
use product_splitter::{
    CapturingLogger, Envelope, InboundMessage, SplitterStage, SubMessage, XmlProductExtractor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Collector {
    received: Mutex<Vec<Envelope>>,
}
#[async_trait]
impl MessageHandler for Collector {
    fn handler_name(&self) -> &str {
        "collector"
    }
    fn handled_message_type(&self) -> HandledMessageType {
        HandledMessageType::One("xml".into())
    }
    async fn handle(&self, message: &Envelope) -> AnyResult<()> {
        self.received.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
struct BulletinCounter {
    count: AtomicUsize,
}
#[async_trait]
impl MessageHandler for BulletinCounter {
    fn handler_name(&self) -> &str {
        "bulletin-counter"
    }
    fn handled_message_type(&self) -> HandledMessageType {
        HandledMessageType::One("bulletin".into())
    }
    async fn handle(&self, _message: &Envelope) -> AnyResult<()> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

fn xml_stage(logger: Arc<CapturingLogger>) -> Arc<SplitterStage> {
    Arc::new(
        SplitterStage::builder()
            .extractor(Arc::new(XmlProductExtractor::new()))
            .logger(logger)
            .build(),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn bulletins_are_split_into_independent_xml_messages() -> AnyResult<()> {
    let bus = Arc::new(InMemoryMessageBus::new(256));
    let logger = Arc::new(CapturingLogger::new());
    let splitter = Arc::new(SplitterHandler::new(
        xml_stage(logger.clone()),
        Arc::new(BusPublisher::new(bus.clone())),
        HandledMessageType::One("bulletin".into()),
    ));
    let collector = Arc::new(Collector::default());

    let engine = Arc::new(
        DispatchEngine::builder()
            .message_bus(bus.clone())
            .message_handlers(vec![splitter, collector.clone()])
            .config(DispatchConfig {
                handler_concurrency: 4,
            })
            .build(),
    );
    let handle = engine.start().await;

    let three = "WUUS53 KOAX 191200\n\
                 <?xml version=\"1.0\"?><alert><id>1</id></alert>\n\
                 <?xml version=\"1.0\"?><alert><id>2</id></alert>\n\
                 <?xml version=\"1.0\"?><dwml><data/></dwml>\n\
                 $$";
    let plain = "FXUS63 KDMX 191130\nAREA FORECAST DISCUSSION\n$$";
    let broken = "<?xml version=\"1.0\"?><alert><id>3</id>\n<?xml version=\"1.0\"?><summary/>";

    let first = Envelope::new("bulletin", three);
    bus.publish(&first).await?;
    bus.publish(&Envelope::new("bulletin", plain)).await?;
    bus.publish(&Envelope::new("bulletin", broken)).await?;

    // 使用 timeout + 轮询条件，减少固定 sleep 带来的不确定性
    let _ = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if collector.received.lock().unwrap().len() >= 4 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    handle.shutdown();
    handle.join().await;

    let received = collector.received.lock().unwrap();
    assert_eq!(received.len(), 4);

    let from_first: Vec<&Envelope> = received
        .iter()
        .filter(|e| e.parent_id() == Some(first.message_id()))
        .collect();
    assert_eq!(from_first.len(), 3);
    let mut ids: Vec<&str> = from_first.iter().map(|e| e.message_id()).collect();
    ids.sort();
    let expected: Vec<String> = (0..3).map(|i| format!("{}/{}", first.message_id(), i)).collect();
    assert_eq!(ids, expected);

    assert_eq!(
        received.iter().filter(|e| e.subject() == Some("summary")).count(),
        1
    );

    let infos: Vec<String> = logger
        .entries()
        .into_iter()
        .filter(|e| e.level == LogLevel::Info)
        .map(|e| e.message)
        .collect();
    assert_eq!(infos.len(), 2);
    assert!(infos.contains(&"Splitting product into 3 xml files".to_string()));
    assert!(infos.contains(&"Splitting product into 1 xml files".to_string()));
    assert_eq!(logger.count(LogLevel::Error), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn poison_bulletin_does_not_stall_the_dispatch_loop() -> AnyResult<()> {
    let bus = Arc::new(InMemoryMessageBus::new(64));
    let logger = Arc::new(CapturingLogger::new());
    let stage = Arc::new(
        SplitterStage::builder()
            .extractor(Arc::new(
                |m: &InboundMessage| -> AnyResult<Vec<SubMessage>> {
                    if m.text().contains("POISON") {
                        panic!("unparseable header");
                    }
                    anyhow::bail!("no sub-products in {}", m.id())
                },
            ))
            .logger(logger.clone())
            .build(),
    );
    let splitter = Arc::new(SplitterHandler::new(
        stage,
        Arc::new(BusPublisher::new(bus.clone())),
        HandledMessageType::All,
    ));
    let counter = Arc::new(BulletinCounter::default());

    let engine = Arc::new(
        DispatchEngine::builder()
            .message_bus(bus.clone())
            .message_handlers(vec![splitter, counter.clone()])
            .build(),
    );
    let handle = engine.start().await;

    bus.publish(&Envelope::new("bulletin", "POISON")).await?;
    bus.publish(&Envelope::new("bulletin", "ordinary")).await?;

    let _ = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if counter.count.load(Ordering::Relaxed) >= 2 && logger.count(LogLevel::Error) >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    handle.shutdown();
    handle.join().await;

    assert_eq!(counter.count.load(Ordering::Relaxed), 2);
    let errors: Vec<String> = logger
        .entries()
        .into_iter()
        .filter(|e| e.level == LogLevel::Error)
        .map(|e| e.message)
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("extractor panicked"));
    assert!(errors[1].starts_with("extraction failed"));
    assert_eq!(logger.count(LogLevel::Info), 0);
    Ok(())
}
