//! Copy-to-clipboard control.
//!
//! Writing to the clipboard is the host's business. The control only knows the
//! text it is bound to and hands it over when activated.

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("Clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ClipboardWriter {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

impl<W: ClipboardWriter + ?Sized> ClipboardWriter for &W {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// Copy button bound to the code exactly as extracted, sentinel included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyControl {
    value: String,
}

impl CopyControl {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Fire-and-forget: failure feedback is the writer's job.
    pub fn activate<W: ClipboardWriter + ?Sized>(&self, writer: &W) {
        match writer.write_text(&self.value) {
            Ok(()) => log::debug!("Copied {} bytes to clipboard", self.value.len()),
            Err(e) => log::debug!("Clipboard write failed: {e}"),
        }
    }
}
