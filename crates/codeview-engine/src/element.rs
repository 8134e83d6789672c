//! Rendered code elements and their highlight bookkeeping.
//!
//! Highlight state belongs to an element instance, not to the text it shows.
//! Re-rendering into the same instance keeps the state while the text grows;
//! a new instance starts un-highlighted.

use std::fmt;
use uuid::Uuid;

use crate::highlight::{AnnotatedContent, HighlightError, Highlighter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built but not yet attached to the live view.
    Created,
    Attached,
    /// Torn down. A detached element never becomes attached again.
    Detached,
}

/// The `data-highlighted` flag of an element. Set once, never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightState {
    is_highlighted: bool,
}

impl HighlightState {
    pub fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }
}

#[derive(Debug, Clone)]
pub struct CodeElement {
    id: ElementId,
    lifecycle: Lifecycle,
    highlight: HighlightState,
    annotated: Option<AnnotatedContent>,
}

impl Default for CodeElement {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeElement {
    pub fn new() -> Self {
        Self {
            id: ElementId::new(),
            lifecycle: Lifecycle::Created,
            highlight: HighlightState::default(),
            annotated: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle == Lifecycle::Attached
    }

    pub fn attach(&mut self) {
        if self.lifecycle == Lifecycle::Created {
            self.lifecycle = Lifecycle::Attached;
        }
    }

    pub fn detach(&mut self) {
        self.lifecycle = Lifecycle::Detached;
    }

    pub fn highlight_state(&self) -> HighlightState {
        self.highlight
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight.is_highlighted()
    }

    pub fn annotated(&self) -> Option<&AnnotatedContent> {
        self.annotated.as_ref()
    }

    /// Run `highlighter` over `code` and store the result on this element.
    ///
    /// The flag is only set once the highlighter has returned successfully; a
    /// failure leaves the element exactly as it was.
    pub fn apply_highlight<H: Highlighter + ?Sized>(
        &mut self,
        highlighter: &H,
        language: &str,
        code: &str,
    ) -> Result<(), HighlightError> {
        let annotated = highlighter.highlight(language, code)?;
        self.annotated = Some(annotated);
        self.highlight.is_highlighted = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{CountingHighlighter, FailingHighlighter};

    #[test]
    fn new_elements_have_distinct_ids() {
        assert_ne!(CodeElement::new().id(), CodeElement::new().id());
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        let mut element = CodeElement::new();
        assert_eq!(element.lifecycle(), Lifecycle::Created);

        element.attach();
        assert!(element.is_attached());

        element.detach();
        element.attach();
        assert_eq!(element.lifecycle(), Lifecycle::Detached);
    }

    #[test]
    fn apply_highlight_sets_flag_and_content() {
        let highlighter = CountingHighlighter::default();
        let mut element = CodeElement::new();

        element
            .apply_highlight(&highlighter, "python", "print(1)")
            .unwrap();

        assert!(element.is_highlighted());
        assert_eq!(element.annotated().unwrap().text(), "print(1)");
        assert_eq!(highlighter.calls(), 1);
    }

    #[test]
    fn failed_highlight_leaves_flag_unset() {
        let mut element = CodeElement::new();

        let result = element.apply_highlight(&FailingHighlighter, "python", "print(1)");

        assert!(result.is_err());
        assert!(!element.is_highlighted());
        assert!(element.annotated().is_none());
    }
}
