use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use codeview_engine::{ClipboardError, ClipboardWriter};
use std::cell::RefCell;
use std::io::{Stdout, Write, stdout};

/// Terminals commonly drop OSC 52 payloads beyond this size.
const MAX_ENCODED_LEN: usize = 100_000;

/// Writes to the system clipboard through the terminal (OSC 52).
pub struct Osc52Clipboard<W: Write> {
    out: RefCell<W>,
}

impl Osc52Clipboard<Stdout> {
    pub fn stdout() -> Self {
        Self::new(stdout())
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> ClipboardWriter for Osc52Clipboard<W> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let encoded = STANDARD.encode(text);
        if encoded.len() > MAX_ENCODED_LEN {
            return Err(ClipboardError::Unavailable(format!(
                "{} bytes is too large for OSC 52",
                text.len()
            )));
        }
        let mut out = self.out.borrow_mut();
        write!(out, "\x1b]52;c;{encoded}\x07")?;
        out.flush()?;
        Ok(())
    }
}
