use super::Extractor;
use crate::message::{InboundMessage, SubMessage};
use regex::Regex;
use std::sync::LazyLock;

static DECLARATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\?xml\s[^>]*\?>").expect("xml declaration regex"));

// 声明与根元素之间允许出现的空白、注释、处理指令与 DOCTYPE
static PROLOG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?:\s+|<!--.*?-->|<\?.*?\?>|<!DOCTYPE[^\[>]*(?:\[.*?\])?\s*>|<![^>]*>)*")
        .expect("xml prolog regex")
});

static ROOT_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z_][\w.:-]*)[^>]*>").expect("xml root tag regex"));

/// 公报内嵌 XML 子产品抽取器
///
/// 每个 `<?xml ...?>` 声明开启一个候选片段，直到下一个声明为止
/// （`<?xml-stylesheet ...?>` 等处理指令不算声明）；
/// 声明后的注释、处理指令与 DOCTYPE 被跳过，其后第一个元素为根元素；
/// 片段在根元素最后一个闭合标签处（或自闭合根元素处）结束。
/// 缺少根元素或闭合标签的片段会被跳过。
#[derive(Clone, Debug)]
pub struct XmlProductExtractor {
    kind: String,
}

impl Default for XmlProductExtractor {
    fn default() -> Self {
        Self {
            kind: "xml".to_string(),
        }
    }
}

impl XmlProductExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定子消息的类型（同时作为总线上的消息类型）
    pub fn with_kind(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// 返回文本中所有完整的 XML 片段：`(根元素名, 片段文本)`
    pub fn fragments(text: &str) -> Vec<(&str, &str)> {
        let starts: Vec<usize> = DECLARATION_REGEX
            .find_iter(text)
            .map(|m| m.start())
            .collect();

        let mut out = Vec::with_capacity(starts.len());
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            let segment = &text[start..end];
            match Self::fragment(segment) {
                Some(found) => out.push(found),
                None => tracing::debug!(offset = start, "skipping incomplete xml segment"),
            }
        }
        out
    }

    fn fragment(segment: &str) -> Option<(&str, &str)> {
        let declaration = DECLARATION_REGEX.find(segment)?;
        let prolog = PROLOG_REGEX.find(&segment[declaration.end()..])?;
        let prolog_end = declaration.end() + prolog.end();
        let caps = ROOT_TAG_REGEX.captures(&segment[prolog_end..])?;
        let tag = caps.get(0)?;
        let name = caps.get(1)?.as_str();
        let tag_end = prolog_end + tag.end();

        if tag.as_str().ends_with("/>") {
            return Some((name, &segment[..tag_end]));
        }

        let close = format!("</{name}>");
        let close_at = segment.rfind(&close)?;
        if close_at < tag_end {
            return None;
        }
        Some((name, &segment[..close_at + close.len()]))
    }
}

impl Extractor for XmlProductExtractor {
    fn extract(&self, message: &InboundMessage) -> anyhow::Result<Vec<SubMessage>> {
        let items = Self::fragments(message.text())
            .into_iter()
            .enumerate()
            .map(|(index, (name, content))| {
                SubMessage::builder()
                    .id(format!("{}/{}", message.id(), index))
                    .parent_id(message.id().to_string())
                    .kind(self.kind.clone())
                    .name(name.to_string())
                    .index(index)
                    .content(content.to_string())
                    .build()
            })
            .collect();

        Ok(items)
    }
}
