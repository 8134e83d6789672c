pub mod clipboard;
pub mod element;
pub mod highlight;
pub mod html;
pub mod parsing;
pub mod render;
pub mod stream;
pub mod theme;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use clipboard::{ClipboardError, ClipboardWriter, CopyControl};
pub use element::{CodeElement, ElementId, HighlightState};
pub use highlight::{
    AnnotatedContent, HighlightError, HighlightSpan, Highlighter, SpanStyle, SyntectHighlighter,
};
pub use parsing::{CodeBlock, CodeNode, code_nodes, language_from_class};
pub use render::{
    Body, CodeBlockRenderer, CodeBlockView, Header, RAW_CODE_LABEL, RenderError, RenderPath,
    RenderReport, RenderedBlock,
};
pub use stream::{CURSOR_SENTINEL, StreamFeed, StreamState};
pub use theme::{ColorScheme, Rgb};
