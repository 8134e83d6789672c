//! HTML output for rendered code blocks.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::highlight::{HighlightSpan, SpanStyle};
use crate::render::{Body, Header, RenderedBlock};

pub const CURSOR_CLASS: &str = "blinking-cursor";

pub fn to_html(block: &RenderedBlock) -> String {
    let mut html = String::from(r#"<div class="code-block">"#);
    write_header(&mut html, &block.header);
    match &block.body {
        Body::Highlighted {
            language,
            segments,
            cursor,
        } => {
            html.push_str(&format!(
                r#"<pre style="margin:0"><code class="language-{} hljs">"#,
                encode_double_quoted_attribute(language)
            ));
            for span in segments {
                write_span(&mut html, span);
            }
            if *cursor {
                html.push_str(&format!(r#"<span class="{CURSOR_CLASS}"></span>"#));
            }
            html.push_str("</code></pre>");
        }
        Body::Raw { text, background } => {
            html.push_str(&format!(
                r#"<div class="code-raw" style="background:{background}"><code style="white-space:pre-wrap">{}</code></div>"#,
                encode_text(text)
            ));
        }
    }
    html.push_str("</div>");
    html
}

fn write_header(html: &mut String, header: &Header) {
    html.push_str(&format!(
        r#"<div class="code-header" style="background:{};color:{}"><span class="code-language">{}</span><button class="copy-button" data-clipboard-text="{}">Copy</button></div>"#,
        header.background,
        header.foreground,
        encode_text(&header.label),
        encode_double_quoted_attribute(header.copy.value())
    ));
}

fn write_span(html: &mut String, span: &HighlightSpan) {
    if span.style.is_plain() {
        html.push_str(&encode_text(&span.text));
        return;
    }
    html.push_str(&format!(
        r#"<span style="{}">{}</span>"#,
        css(&span.style),
        encode_text(&span.text)
    ));
}

fn css(style: &SpanStyle) -> String {
    let mut rules = Vec::new();
    if let Some(fg) = style.foreground {
        rules.push(format!("color:{fg}"));
    }
    if style.bold {
        rules.push("font-weight:bold".to_string());
    }
    if style.italic {
        rules.push("font-style:italic".to_string());
    }
    if style.underline {
        rules.push("text-decoration:underline".to_string());
    }
    rules.join(";")
}
