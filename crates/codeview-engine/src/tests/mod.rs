use std::cell::{Cell, RefCell};

use crate::clipboard::{ClipboardError, ClipboardWriter};
use crate::highlight::{
    AnnotatedContent, HighlightError, HighlightSpan, Highlighter, SpanStyle,
};
use crate::theme::Rgb;

/// Highlighter that colours everything and counts how often it was asked.
#[derive(Debug, Default)]
pub struct CountingHighlighter {
    calls: Cell<usize>,
}

impl CountingHighlighter {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Highlighter for CountingHighlighter {
    fn highlight(&self, _language: &str, code: &str) -> Result<AnnotatedContent, HighlightError> {
        self.calls.set(self.calls.get() + 1);
        Ok(AnnotatedContent::new(vec![HighlightSpan::styled(
            code,
            SpanStyle {
                foreground: Some(Rgb::new(0xa6, 0xe2, 0x2e)),
                ..SpanStyle::default()
            },
        )]))
    }
}

pub struct FailingHighlighter;

impl Highlighter for FailingHighlighter {
    fn highlight(&self, language: &str, _code: &str) -> Result<AnnotatedContent, HighlightError> {
        Err(HighlightError::Engine {
            language: language.to_string(),
            message: "boom".to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct RecordingClipboard {
    writes: RefCell<Vec<String>>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn failing() -> Self {
        Self {
            writes: RefCell::default(),
            fail: true,
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl ClipboardWriter for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable("no clipboard in tests".to_string()));
        }
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}
