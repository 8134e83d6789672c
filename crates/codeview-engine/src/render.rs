//! Code block rendering.
//!
//! Every render picks one of two paths from the current inputs:
//!
//! - **Highlighted**: a language tag matched and there is code. The element is
//!   run through the [`Highlighter`] once, after it has been painted and
//!   attached. Later renders reuse that annotation, show the sentinel-free text
//!   and draw a cursor while the producer is still appending.
//! - **Raw**: everything else. The text is shown verbatim on the scheme's
//!   surface colour.
//!
//! Both paths get a header with the language label and a copy control bound
//! to the unmodified code.
//!
//! [`CodeBlockRenderer`] holds the stateless parts (paint, post-paint effect).
//! [`CodeBlockView`] is one component instance driven through render cycles
//! the way a reactive host would drive it.

use crate::clipboard::CopyControl;
use crate::element::{CodeElement, Lifecycle};
use crate::highlight::{AnnotatedContent, HighlightError, HighlightSpan, Highlighter};
use crate::parsing::{CodeBlock, CodeNode};
use crate::stream::StreamState;
use crate::theme::{ColorScheme, Rgb};

/// Header label when no language was recognised.
pub const RAW_CODE_LABEL: &str = "Raw code";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Highlight(#[from] HighlightError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    Highlighted,
    Raw,
}

impl RenderPath {
    /// Highlighted iff a language matched and the code is non-empty.
    pub fn select(language: Option<&str>, code: &str) -> Self {
        match language {
            Some(_) if !code.is_empty() => RenderPath::Highlighted,
            _ => RenderPath::Raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub label: String,
    pub copy: CopyControl,
    pub background: Rgb,
    pub foreground: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Highlighted {
        language: String,
        segments: Vec<HighlightSpan>,
        cursor: bool,
    },
    Raw {
        text: String,
        background: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub header: Header,
    pub body: Body,
}

impl RenderedBlock {
    pub fn path(&self) -> RenderPath {
        match self.body {
            Body::Highlighted { .. } => RenderPath::Highlighted,
            Body::Raw { .. } => RenderPath::Raw,
        }
    }

    /// Text visible to the user, without the cursor overlay.
    pub fn display_text(&self) -> String {
        match &self.body {
            Body::Highlighted { segments, .. } => {
                segments.iter().map(|s| s.text.as_str()).collect()
            }
            Body::Raw { text, .. } => text.clone(),
        }
    }

    pub fn shows_cursor(&self) -> bool {
        matches!(self.body, Body::Highlighted { cursor: true, .. })
    }
}

pub struct CodeBlockRenderer<H> {
    highlighter: H,
    stream: StreamState,
}

impl<H: Highlighter> CodeBlockRenderer<H> {
    pub fn new(highlighter: H) -> Self {
        Self {
            highlighter,
            stream: StreamState::default(),
        }
    }

    pub fn with_stream_state(mut self, stream: StreamState) -> Self {
        self.stream = stream;
        self
    }

    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    pub fn stream_state(&self) -> &StreamState {
        &self.stream
    }

    /// Produce the element tree for `block` from current state. No side effects.
    pub fn paint(
        &self,
        block: &CodeBlock,
        element: &CodeElement,
        scheme: ColorScheme,
    ) -> RenderedBlock {
        let header = Header {
            label: block.language().unwrap_or(RAW_CODE_LABEL).to_string(),
            copy: CopyControl::new(block.raw_content()),
            background: scheme.surface(),
            foreground: scheme.secondary_text(),
        };

        let body = match (block.path(), block.language()) {
            (RenderPath::Highlighted, Some(language)) => {
                let raw = block.raw_content();
                let display = self.stream.strip_sentinel(raw);
                Body::Highlighted {
                    language: language.to_string(),
                    segments: compose_segments(element.annotated(), &display),
                    cursor: self.stream.should_show_cursor(element.is_highlighted(), raw),
                }
            }
            _ => Body::Raw {
                text: block.raw_content().to_string(),
                background: scheme.surface(),
            },
        };

        RenderedBlock { header, body }
    }

    /// Post-paint effect: highlight `element` if it has not been highlighted.
    ///
    /// Returns whether the highlighter ran. Skipped for the raw path and for
    /// elements that are not attached to the live view.
    pub fn run_highlight_effect(
        &self,
        block: &CodeBlock,
        element: &mut CodeElement,
    ) -> Result<bool, RenderError> {
        if !element.is_attached() {
            log::debug!("Skipping highlight for element {} that is not attached", element.id());
            return Ok(false);
        }
        let Some(language) = block.language() else {
            return Ok(false);
        };
        if block.path() != RenderPath::Highlighted
            || !self.stream.should_highlight(element.is_highlighted())
        {
            return Ok(false);
        }

        let code = self.stream.strip_sentinel(block.raw_content());
        element.apply_highlight(&self.highlighter, language, &code)?;
        log::debug!(
            "Highlighted element {} as {language} ({} bytes)",
            element.id(),
            code.len()
        );
        Ok(true)
    }
}

/// Reuse the annotation for the prefix it covers; anything appended since is
/// shown plain so the annotated markup is never re-derived.
fn compose_segments(annotated: Option<&AnnotatedContent>, display: &str) -> Vec<HighlightSpan> {
    let Some(annotated) = annotated else {
        return plain_segments(display);
    };

    let annotated_text = annotated.text();
    match display.strip_prefix(annotated_text.as_str()) {
        Some(tail) => {
            let mut segments = annotated.spans().to_vec();
            if !tail.is_empty() {
                segments.push(HighlightSpan::plain(tail));
            }
            segments
        }
        None => {
            log::debug!("Content no longer extends the highlighted text, showing it plain");
            plain_segments(display)
        }
    }
}

fn plain_segments(display: &str) -> Vec<HighlightSpan> {
    if display.is_empty() {
        Vec::new()
    } else {
        vec![HighlightSpan::plain(display)]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// The highlighter ran during this cycle.
    pub highlight_invoked: bool,
    /// Paints needed to settle: two when the effect changed state.
    pub paints: usize,
}

/// One code block component instance.
///
/// Owns the element for the highlighted path. The element lives as long as
/// the instance keeps taking the highlighted path; switching to the raw path
/// tears it down and the next highlighted render mounts a fresh one.
#[derive(Debug, Default)]
pub struct CodeBlockView {
    element: CodeElement,
    pending: Option<CodeBlock>,
}

impl CodeBlockView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self) -> &CodeElement {
        &self.element
    }

    /// Paint from `node` and queue the post-paint effect.
    pub fn paint<H: Highlighter>(
        &mut self,
        renderer: &CodeBlockRenderer<H>,
        node: &CodeNode,
        scheme: ColorScheme,
    ) -> RenderedBlock {
        let block = CodeBlock::from_node(node);
        match (block.path(), self.element.lifecycle()) {
            (RenderPath::Highlighted, Lifecycle::Created) => self.element.attach(),
            (RenderPath::Highlighted, Lifecycle::Detached) => {
                self.element = CodeElement::new();
                self.element.attach();
            }
            (RenderPath::Raw, Lifecycle::Attached) => self.element.detach(),
            _ => {}
        }

        let rendered = renderer.paint(&block, &self.element, scheme);
        self.pending = Some(block);
        rendered
    }

    /// Run the queued effect. Returns whether the highlighter ran.
    pub fn commit<H: Highlighter>(
        &mut self,
        renderer: &CodeBlockRenderer<H>,
    ) -> Result<bool, RenderError> {
        match self.pending.take() {
            Some(block) => renderer.run_highlight_effect(&block, &mut self.element),
            None => Ok(false),
        }
    }

    /// Paint, run effects, and repaint if the effect changed state.
    ///
    /// A highlighter failure is returned as is; the next render tries again
    /// because the element was left un-highlighted.
    pub fn render<H: Highlighter>(
        &mut self,
        renderer: &CodeBlockRenderer<H>,
        node: &CodeNode,
        scheme: ColorScheme,
    ) -> Result<(RenderedBlock, RenderReport), RenderError> {
        let mut rendered = self.paint(renderer, node, scheme);
        let mut report = RenderReport {
            highlight_invoked: false,
            paints: 1,
        };

        if self.commit(renderer)? {
            report.highlight_invoked = true;
            rendered = self.paint(renderer, node, scheme);
            report.paints += 1;
            self.commit(renderer)?;
        }

        Ok((rendered, report))
    }

    /// Tear the element down. A queued effect will find it detached.
    pub fn unmount(&mut self) {
        self.element.detach();
    }

    /// Replace the element with a new instance, as on a key change.
    pub fn remount(&mut self) {
        self.element.detach();
        self.element = CodeElement::new();
        self.pending = None;
    }
}
