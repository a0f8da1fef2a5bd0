//! Structured rich text and its HTML / plain-text renderings

use serde::{Deserialize, Deserializer, Serialize};

use crate::helpers::html_escape;

/// A text run shared by paragraphs, headings, list items and preformatted blocks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "supported_spans")]
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OEmbed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbedBlock {
    #[serde(default)]
    pub oembed: OEmbed,
}

/// One block of a rich-text field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
    /// Block types this renderer does not know; skipped
    #[serde(other)]
    Unsupported,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(TextBlock {
            text: text.into(),
            spans: Vec::new(),
        })
    }

    /// Text content, `None` for blocks without text
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::Heading4(b)
            | Block::Heading5(b)
            | Block::Heading6(b)
            | Block::Paragraph(b)
            | Block::Preformatted(b)
            | Block::ListItem(b)
            | Block::OListItem(b) => Some(&b.text),
            Block::Image(_) | Block::Embed(_) | Block::Unsupported => None,
        }
    }
}

/// Inline formatting over a range of a block's text
///
/// `start` and `end` are UTF-16 offsets, as produced by the content API.
///
/// Unknown span types and broken links are dropped while deserializing, so
/// their text renders without markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "RawSpan")]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink { url: String, target: Option<String> },
    Label { name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSpan {
    start: usize,
    end: usize,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl Span {
    /// `None` for spans that render as plain text
    fn from_raw(raw: RawSpan) -> Option<Self> {
        let data_str = |key: &str| {
            raw.data
                .as_ref()
                .and_then(|d| d.get(key))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        let is_broken = raw
            .data
            .as_ref()
            .and_then(|d| d.get("isBroken"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let kind = match raw.kind.as_str() {
            "strong" => SpanKind::Strong,
            "em" => SpanKind::Em,
            "hyperlink" => {
                let url = match (data_str("url"), data_str("type"), data_str("uid")) {
                    (Some(url), _, _) => url,
                    (None, Some(doc_type), Some(uid)) if !is_broken => {
                        format!("/{}/{}", doc_type, uid)
                    }
                    _ => {
                        tracing::debug!("Rendering broken link at {}..{} as text", raw.start, raw.end);
                        return None;
                    }
                };
                SpanKind::Hyperlink {
                    url,
                    target: data_str("target"),
                }
            }
            "label" => SpanKind::Label {
                name: data_str("label").unwrap_or_default(),
            },
            other => {
                tracing::debug!("Skipping unsupported span type {:?}", other);
                return None;
            }
        };

        Some(Span {
            start: raw.start,
            end: raw.end,
            kind,
        })
    }
}

fn supported_spans<'de, D>(deserializer: D) -> Result<Vec<Span>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawSpan>::deserialize(deserializer)?;
    Ok(raw.into_iter().filter_map(Span::from_raw).collect())
}

impl From<Span> for RawSpan {
    fn from(span: Span) -> Self {
        let (kind, data) = match span.kind {
            SpanKind::Strong => ("strong", None),
            SpanKind::Em => ("em", None),
            SpanKind::Hyperlink { url, target } => {
                let mut data = serde_json::json!({ "link_type": "Web", "url": url });
                if let Some(target) = target {
                    data["target"] = serde_json::Value::String(target);
                }
                ("hyperlink", Some(data))
            }
            SpanKind::Label { name } => ("label", Some(serde_json::json!({ "label": name }))),
        };
        RawSpan {
            start: span.start,
            end: span.end,
            kind: kind.to_string(),
            data,
        }
    }
}

impl Span {
    fn open_tag(&self) -> String {
        match &self.kind {
            SpanKind::Strong => "<strong>".to_string(),
            SpanKind::Em => "<em>".to_string(),
            SpanKind::Hyperlink { url, target } => match target {
                Some(target) => format!(
                    r#"<a href="{}" target="{}" rel="noopener noreferrer">"#,
                    html_escape(url),
                    html_escape(target)
                ),
                None => format!(r#"<a href="{}">"#, html_escape(url)),
            },
            SpanKind::Label { name } => format!(r#"<span class="{}">"#, html_escape(name)),
        }
    }

    fn close_tag(&self) -> &'static str {
        match self.kind {
            SpanKind::Strong => "</strong>",
            SpanKind::Em => "</em>",
            SpanKind::Hyperlink { .. } => "</a>",
            SpanKind::Label { .. } => "</span>",
        }
    }
}

/// Render blocks as HTML
///
/// Consecutive list items are grouped into a single `<ul>` or `<ol>`.
pub fn as_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list = match block {
            Block::ListItem(_) => Some("ul"),
            Block::OListItem(_) => Some("ol"),
            _ => None,
        };
        if open_list != list {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list;
        }

        match block {
            Block::Heading1(b) => push_element(&mut html, "h1", b),
            Block::Heading2(b) => push_element(&mut html, "h2", b),
            Block::Heading3(b) => push_element(&mut html, "h3", b),
            Block::Heading4(b) => push_element(&mut html, "h4", b),
            Block::Heading5(b) => push_element(&mut html, "h5", b),
            Block::Heading6(b) => push_element(&mut html, "h6", b),
            Block::Paragraph(b) => push_element(&mut html, "p", b),
            Block::Preformatted(b) => push_element(&mut html, "pre", b),
            Block::ListItem(b) | Block::OListItem(b) => push_element(&mut html, "li", b),
            Block::Image(image) => {
                html.push_str(&format!(
                    r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                    html_escape(&image.url),
                    html_escape(image.alt.as_deref().unwrap_or(""))
                ));
            }
            Block::Embed(embed) => {
                let oembed = &embed.oembed;
                html.push_str(&format!(
                    r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
                    html_escape(oembed.embed_url.as_deref().unwrap_or("")),
                    html_escape(oembed.kind.as_deref().unwrap_or("")),
                    html_escape(oembed.provider_name.as_deref().unwrap_or("")),
                    oembed.html.as_deref().unwrap_or("")
                ));
            }
            Block::Unsupported => {}
        }
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Render blocks as plain text, one space between blocks
pub fn as_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(Block::text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_element(html: &mut String, tag: &str, block: &TextBlock) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&render_spans(&block.text, &block.spans));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

/// Escape `text` and wrap span ranges in their tags, keeping tags properly nested
fn render_spans(text: &str, spans: &[Span]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut stack: Vec<usize> = Vec::new();
    let mut offset = 0;

    for ch in text.chars() {
        span_boundary(offset, spans, &mut stack, &mut out);
        match ch {
            '\n' => out.push_str("<br />"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
        offset += ch.len_utf16();
    }
    span_boundary(offset, spans, &mut stack, &mut out);

    while let Some(index) = stack.pop() {
        out.push_str(spans[index].close_tag());
    }

    out
}

fn span_boundary(at: usize, spans: &[Span], stack: &mut Vec<usize>, out: &mut String) {
    // Close every span ending here; spans opened after one of them are
    // closed too and reopened right away.
    let mut reopen = Vec::new();
    while stack.iter().any(|&i| spans[i].end <= at) {
        let Some(top) = stack.pop() else { break };
        out.push_str(spans[top].close_tag());
        if spans[top].end > at {
            reopen.push(top);
        }
    }
    for index in reopen.into_iter().rev() {
        out.push_str(&spans[index].open_tag());
        stack.push(index);
    }

    let mut starting: Vec<usize> = (0..spans.len())
        .filter(|&i| spans[i].start == at && spans[i].end > at)
        .collect();
    // Longest first so shorter spans nest inside
    starting.sort_by(|&a, &b| spans[b].end.cmp(&spans[a].end));
    for index in starting {
        out.push_str(&spans[index].open_tag());
        stack.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(json: serde_json::Value) -> Vec<Block> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let body = blocks(serde_json::json!([
            {"type": "heading2", "text": "Hooks", "spans": []},
            {"type": "paragraph", "text": "Pensando em sincronização.", "spans": []}
        ]));
        assert_eq!(
            as_html(&body),
            "<h2>Hooks</h2><p>Pensando em sincronização.</p>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let body = vec![Block::paragraph("<script>alert('x')</script> & more")];
        assert_eq!(
            as_html(&body),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more</p>"
        );
    }

    #[test]
    fn test_newlines_become_breaks() {
        let body = vec![Block::paragraph("one\ntwo")];
        assert_eq!(as_html(&body), "<p>one<br />two</p>");
    }

    #[test]
    fn test_spans() {
        let body = blocks(serde_json::json!([{
            "type": "paragraph",
            "text": "bold and link",
            "spans": [
                {"start": 0, "end": 4, "type": "strong"},
                {"start": 9, "end": 13, "type": "hyperlink",
                 "data": {"link_type": "Web", "url": "https://example.com"}}
            ]
        }]));
        assert_eq!(
            as_html(&body),
            r#"<p><strong>bold</strong> and <a href="https://example.com">link</a></p>"#
        );
    }

    #[test]
    fn test_nested_spans() {
        let body = blocks(serde_json::json!([{
            "type": "paragraph",
            "text": "all bold",
            "spans": [
                {"start": 4, "end": 8, "type": "em"},
                {"start": 0, "end": 8, "type": "strong"}
            ]
        }]));
        assert_eq!(as_html(&body), "<p><strong>all <em>bold</em></strong></p>");
    }

    #[test]
    fn test_overlapping_spans_stay_well_formed() {
        let body = blocks(serde_json::json!([{
            "type": "paragraph",
            "text": "abcdef",
            "spans": [
                {"start": 0, "end": 4, "type": "strong"},
                {"start": 2, "end": 6, "type": "em"}
            ]
        }]));
        assert_eq!(
            as_html(&body),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_span_offsets_are_utf16() {
        // "🚀" takes two UTF-16 units
        let body = blocks(serde_json::json!([{
            "type": "paragraph",
            "text": "🚀 go",
            "spans": [{"start": 3, "end": 5, "type": "em"}]
        }]));
        assert_eq!(as_html(&body), "<p>🚀 <em>go</em></p>");
    }

    #[test]
    fn test_list_items_are_grouped() {
        let body = blocks(serde_json::json!([
            {"type": "list-item", "text": "a", "spans": []},
            {"type": "list-item", "text": "b", "spans": []},
            {"type": "o-list-item", "text": "c", "spans": []},
            {"type": "paragraph", "text": "d", "spans": []}
        ]));
        assert_eq!(
            as_html(&body),
            "<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol><p>d</p>"
        );
    }

    #[test]
    fn test_image_and_unknown_blocks() {
        let body = blocks(serde_json::json!([
            {"type": "image", "url": "https://images.prismic.io/x.png", "alt": "rocket",
             "dimensions": {"width": 10, "height": 10}},
            {"type": "slice-of-something"}
        ]));
        assert_eq!(
            as_html(&body),
            r#"<p class="block-img"><img src="https://images.prismic.io/x.png" alt="rocket" /></p>"#
        );
    }

    #[test]
    fn test_document_link_without_url() {
        let body = blocks(serde_json::json!([{
            "type": "paragraph",
            "text": "next",
            "spans": [{"start": 0, "end": 4, "type": "hyperlink",
                       "data": {"link_type": "Document", "type": "post", "uid": "criando-um-app"}}]
        }]));
        assert_eq!(
            as_html(&body),
            r#"<p><a href="/post/criando-um-app">next</a></p>"#
        );
    }

    #[test]
    fn test_broken_document_link_renders_as_text() {
        let body = blocks(serde_json::json!([{
            "type": "paragraph",
            "text": "see this post",
            "spans": [
                {"start": 0, "end": 3, "type": "strong"},
                {"start": 4, "end": 13, "type": "hyperlink",
                 "data": {"link_type": "Document", "isBroken": true, "type": "broken_type"}}
            ]
        }]));
        assert_eq!(as_html(&body), "<p><strong>see</strong> this post</p>");
    }

    #[test]
    fn test_unknown_span_is_skipped() {
        let body = blocks(serde_json::json!([{
            "type": "paragraph",
            "text": "blinking text",
            "spans": [
                {"start": 0, "end": 8, "type": "blink"},
                {"start": 9, "end": 13, "type": "em"}
            ]
        }]));
        assert_eq!(as_html(&body), "<p>blinking <em>text</em></p>");
    }

    #[test]
    fn test_as_text() {
        let body = blocks(serde_json::json!([
            {"type": "heading2", "text": "Title", "spans": []},
            {"type": "image", "url": "https://images.prismic.io/x.png"},
            {"type": "paragraph", "text": "Body text", "spans": []}
        ]));
        assert_eq!(as_text(&body), "Title Body text");
    }
}
