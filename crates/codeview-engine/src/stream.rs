//! Streaming state for code blocks whose text is still being produced.
//!
//! A producer that is still appending to a block marks the end of the text it
//! has emitted so far with [`CURSOR_SENTINEL`]. The renderer never shows the
//! sentinel itself; it uses it to decide whether to draw a cursor overlay after
//! the text. Highlighting is gated separately: an element is highlighted once
//! and only once, however many times it is re-rendered while the stream grows.

use std::borrow::Cow;

use crate::parsing::{CodeBlock, CodeNode, code_nodes};
use crate::render::RenderPath;

/// End-of-stream marker agreed between content producers and the renderer.
///
/// Built from private-use code points so it cannot collide with real source.
pub const CURSOR_SENTINEL: &str = "\u{F8FF}cursor\u{F8FF}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamState {
    sentinel: Cow<'static, str>,
}

impl Default for StreamState {
    fn default() -> Self {
        Self {
            sentinel: Cow::Borrowed(CURSOR_SENTINEL),
        }
    }
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a producer-specific sentinel instead of [`CURSOR_SENTINEL`].
    ///
    /// An empty sentinel would match every string, so it falls back to the
    /// default.
    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        let sentinel = sentinel.into();
        if sentinel.is_empty() {
            log::warn!("Ignoring empty cursor sentinel, using the default");
            return Self::default();
        }
        Self {
            sentinel: Cow::Owned(sentinel),
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Whether the highlighter still has to run for an element.
    ///
    /// When this returns true the caller invokes the highlighter and then marks
    /// the element, so the same element never gets a second true.
    pub fn should_highlight(&self, element_already_marked_highlighted: bool) -> bool {
        !element_already_marked_highlighted
    }

    /// The cursor overlay is drawn only after the highlight pass has run and
    /// only while the producer is still appending.
    pub fn should_show_cursor(&self, is_highlighted: bool, raw_content: &str) -> bool {
        is_highlighted && self.contains_sentinel(raw_content)
    }

    pub fn contains_sentinel(&self, raw_content: &str) -> bool {
        raw_content.contains(self.sentinel())
    }

    /// Remove the first sentinel occurrence. Later occurrences are kept.
    pub fn strip_sentinel<'a>(&self, raw_content: &'a str) -> Cow<'a, str> {
        let sentinel = self.sentinel();
        match raw_content.find(sentinel) {
            Some(start) => {
                let mut stripped = String::with_capacity(raw_content.len() - sentinel.len());
                stripped.push_str(&raw_content[..start]);
                stripped.push_str(&raw_content[start + sentinel.len()..]);
                Cow::Owned(stripped)
            }
            None => Cow::Borrowed(raw_content),
        }
    }
}

/// Replays a finished text as if a generator were producing it chunk by chunk.
///
/// While the feed is incomplete its content carries the sentinel at the end;
/// once everything has been emitted the sentinel is dropped.
#[derive(Debug, Clone)]
pub struct StreamFeed {
    source: String,
    emitted: usize,
    chunk_chars: usize,
    stream: StreamState,
}

impl StreamFeed {
    pub fn new(source: impl Into<String>, chunk_chars: usize, stream: &StreamState) -> Self {
        Self {
            source: source.into(),
            emitted: 0,
            chunk_chars: chunk_chars.max(1),
            stream: stream.clone(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.source.len()
    }

    /// Emit the next chunk. Returns false once there is nothing left.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let rest = &self.source[self.emitted..];
        let chunk_len = rest
            .char_indices()
            .nth(self.chunk_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        self.emitted += chunk_len;
        true
    }

    /// Emit everything that is left.
    pub fn finish(&mut self) {
        self.emitted = self.source.len();
    }

    pub fn emitted(&self) -> &str {
        &self.source[..self.emitted]
    }

    /// Text as a consumer sees it right now, sentinel included while open.
    pub fn content(&self) -> String {
        let mut content = self.emitted().to_string();
        if !self.is_finished() {
            content.push_str(self.stream.sentinel());
        }
        content
    }

    /// Code blocks of the current content, ready to render.
    ///
    /// The raw path shows text verbatim, so blocks headed there lose the
    /// sentinel here. Blocks on the highlighted path keep it for the cursor.
    pub fn code_nodes(&self) -> Vec<CodeNode> {
        code_nodes(&self.content())
            .into_iter()
            .map(|mut node| {
                if CodeBlock::from_node(&node).path() == RenderPath::Raw
                    && self.stream.contains_sentinel(&node.text_content)
                {
                    node.text_content = self.stream.strip_sentinel(&node.text_content).into_owned();
                }
                node
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strip_is_identity_without_sentinel() {
        let stream = StreamState::new();
        let code = "fn main() {}\n";

        assert!(matches!(stream.strip_sentinel(code), Cow::Borrowed(_)));
        assert_eq!(stream.strip_sentinel(code), code);
        assert!(!stream.should_show_cursor(true, code));
        assert!(!stream.should_show_cursor(false, code));
    }

    #[test]
    fn strip_removes_single_sentinel() {
        let stream = StreamState::new();
        let code = format!("print(1){CURSOR_SENTINEL}");

        let stripped = stream.strip_sentinel(&code);

        assert_eq!(stripped.len(), code.len() - CURSOR_SENTINEL.len());
        assert!(!stripped.contains(CURSOR_SENTINEL));
        assert_eq!(stripped, "print(1)");
    }

    #[test]
    fn strip_only_removes_first_occurrence() {
        let stream = StreamState::new();
        let code = format!("a{CURSOR_SENTINEL}b{CURSOR_SENTINEL}c");

        assert_eq!(
            stream.strip_sentinel(&code),
            format!("ab{CURSOR_SENTINEL}c")
        );
    }

    #[test]
    fn strip_handles_sentinel_mid_content() {
        let stream = StreamState::new();
        let code = format!("print(1){CURSOR_SENTINEL}\nprint(2)");

        assert_eq!(stream.strip_sentinel(&code), "print(1)\nprint(2)");
    }

    #[test]
    fn cursor_requires_highlight_and_sentinel() {
        let stream = StreamState::new();
        let streaming = format!("x = 1{CURSOR_SENTINEL}");

        assert!(stream.should_show_cursor(true, &streaming));
        assert!(!stream.should_show_cursor(false, &streaming));
        assert!(!stream.should_show_cursor(true, "x = 1"));
    }

    #[test]
    fn should_highlight_fires_once_when_flag_is_updated() {
        let stream = StreamState::new();
        let mut highlighted = false;
        let mut fired = 0;

        for _ in 0..10 {
            if stream.should_highlight(highlighted) {
                fired += 1;
                highlighted = true;
            }
        }

        assert_eq!(fired, 1);
    }

    #[test]
    fn custom_sentinel_is_used() {
        let stream = StreamState::with_sentinel("<|cursor|>");

        assert_eq!(stream.strip_sentinel("ab<|cursor|>"), "ab");
        assert!(!stream.contains_sentinel(&format!("ab{CURSOR_SENTINEL}")));
    }

    #[test]
    fn empty_sentinel_falls_back_to_default() {
        let stream = StreamState::with_sentinel("");
        assert_eq!(stream.sentinel(), CURSOR_SENTINEL);
    }

    #[test]
    fn feed_appends_sentinel_until_finished() {
        let stream = StreamState::new();
        let mut feed = StreamFeed::new("abcdef", 4, &stream);

        assert_eq!(feed.content(), CURSOR_SENTINEL);
        assert!(feed.advance());
        assert_eq!(feed.content(), format!("abcd{CURSOR_SENTINEL}"));
        assert!(feed.advance());
        assert_eq!(feed.content(), "abcdef");
        assert!(feed.is_finished());
        assert!(!feed.advance());
    }

    #[test]
    fn feed_splits_on_char_boundaries() {
        let stream = StreamState::new();
        let mut feed = StreamFeed::new("héllo", 2, &stream);

        feed.advance();
        assert_eq!(feed.emitted(), "hé");
        feed.finish();
        assert_eq!(feed.content(), "héllo");
    }

    #[test]
    fn feed_nodes_hide_sentinel_from_raw_blocks() {
        let stream = StreamState::new();
        let mut feed = StreamFeed::new("Run:\n\n```\nls -la\n```\n", 4, &stream);

        while feed.advance() {
            for node in feed.code_nodes() {
                assert!(!node.text_content.contains(CURSOR_SENTINEL));
            }
        }
        assert_eq!(feed.code_nodes(), vec![CodeNode::untagged("ls -la\n")]);
    }

    #[test]
    fn feed_nodes_keep_sentinel_for_highlighted_blocks() {
        let stream = StreamState::new();
        let mut feed = StreamFeed::new("```python\nprint(1)\n```\n", 14, &stream);

        feed.advance();
        let nodes = feed.code_nodes();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].class_name.as_deref(), Some("language-python"));
        assert!(nodes[0].text_content.starts_with("prin"));
        assert!(nodes[0].text_content.contains(CURSOR_SENTINEL));
    }

    #[test]
    fn feed_with_zero_chunk_size_still_progresses() {
        let stream = StreamState::new();
        let mut feed = StreamFeed::new("ab", 0, &stream);

        assert!(feed.advance());
        assert_eq!(feed.emitted(), "a");
    }
}
