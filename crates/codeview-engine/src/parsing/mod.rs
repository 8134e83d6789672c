//! Turning document nodes into code blocks.
//!
//! A host hands the renderer a [`CodeNode`]: the class name carried by the
//! `<code>` node (`language-python`) and its text. [`CodeBlock`] is the view of
//! that node the renderer works with. Both are re-derived on every render and
//! never persisted.

pub mod markdown;

use regex::Regex;
use std::sync::OnceLock;

use crate::render::RenderPath;
use crate::stream::StreamState;

pub use markdown::code_nodes;

/// Document node as handed over by the host's parse step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeNode {
    pub class_name: Option<String>,
    pub text_content: String,
}

impl CodeNode {
    pub fn new(class_name: Option<String>, text_content: impl Into<String>) -> Self {
        Self {
            class_name,
            text_content: text_content.into(),
        }
    }

    /// Node tagged with the `language-<id>` class convention.
    pub fn with_language(language: &str, text_content: impl Into<String>) -> Self {
        Self::new(Some(format!("language-{language}")), text_content)
    }

    /// Node without a class name.
    pub fn untagged(text_content: impl Into<String>) -> Self {
        Self::new(None, text_content)
    }
}

/// Extract the language identifier from a class name.
///
/// Matches `language-(\w+)` anywhere in the class string; case is preserved.
/// Nothing checks the identifier against a set of known languages.
pub fn language_from_class(class_name: &str) -> Option<&str> {
    static LANGUAGE_CLASS: OnceLock<Regex> = OnceLock::new();
    let pattern = LANGUAGE_CLASS
        .get_or_init(|| Regex::new(r"language-(\w+)").expect("Invalid language class regex"));

    pattern
        .captures(class_name)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    language: Option<String>,
    raw_content: String,
}

impl CodeBlock {
    pub fn new(language: Option<String>, raw_content: impl Into<String>) -> Self {
        Self {
            language,
            raw_content: raw_content.into(),
        }
    }

    pub fn from_node(node: &CodeNode) -> Self {
        let language = node
            .class_name
            .as_deref()
            .and_then(language_from_class)
            .map(str::to_string);
        Self::new(language, node.text_content.clone())
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Full text as extracted, sentinel included.
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    pub fn contains_cursor_marker(&self, stream: &StreamState) -> bool {
        stream.contains_sentinel(&self.raw_content)
    }

    pub fn path(&self) -> RenderPath {
        RenderPath::select(self.language(), &self.raw_content)
    }
}
