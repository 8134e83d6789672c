//! The highlighter seam.
//!
//! Tokenizing is not done here. A [`Highlighter`] is a black box that turns a
//! language tag and a piece of text into [`AnnotatedContent`]; the renderer
//! makes sure it is asked at most once per element.

pub mod syntect_highlighter;

use crate::theme::Rgb;

pub use syntect_highlighter::SyntectHighlighter;

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("No syntax theme named '{0}'")]
    UnknownTheme(String),
    #[error("Failed to highlight {language} code: {message}")]
    Engine { language: String, message: String },
}

pub trait Highlighter {
    /// Annotate `code`. The concatenated span text must equal `code`.
    fn highlight(&self, language: &str, code: &str) -> Result<AnnotatedContent, HighlightError>;
}

impl<H: Highlighter + ?Sized> Highlighter for &H {
    fn highlight(&self, language: &str, code: &str) -> Result<AnnotatedContent, HighlightError> {
        (**self).highlight(language, code)
    }
}

impl<H: Highlighter + ?Sized> Highlighter for Box<H> {
    fn highlight(&self, language: &str, code: &str) -> Result<AnnotatedContent, HighlightError> {
        (**self).highlight(language, code)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub foreground: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl SpanStyle {
    pub fn is_plain(&self) -> bool {
        *self == SpanStyle::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub text: String,
    pub style: SpanStyle,
}

impl HighlightSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Result of the single highlight pass over an element's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedContent {
    spans: Vec<HighlightSpan>,
}

impl AnnotatedContent {
    pub fn new(spans: Vec<HighlightSpan>) -> Self {
        let spans = spans.into_iter().filter(|s| !s.text.is_empty()).collect();
        Self { spans }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![HighlightSpan::plain(text)])
    }

    pub fn spans(&self) -> &[HighlightSpan] {
        &self.spans
    }

    /// The text that was annotated.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn into_spans(self) -> Vec<HighlightSpan> {
        self.spans
    }
}
