use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use super::CodeNode;

/// Collect the code blocks of a markdown document as [`CodeNode`]s.
///
/// Fenced blocks with an info string get a `language-<first word>` class,
/// other blocks get none. An unclosed fence runs to the end of the input, so a
/// document that is still being streamed yields its trailing block too.
pub fn code_nodes(markdown: &str) -> Vec<CodeNode> {
    let mut nodes = Vec::new();
    let mut current: Option<CodeNode> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let class_name = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| format!("language-{lang}")),
                    CodeBlockKind::Indented => None,
                };
                current = Some(CodeNode::new(class_name, String::new()));
            }
            Event::Text(text) => {
                if let Some(node) = current.as_mut() {
                    node.text_content.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(node) = current.take() {
                    nodes.push(node);
                }
            }
            _ => {}
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::CURSOR_SENTINEL;
    use pretty_assertions::assert_eq;

    #[test]
    fn fenced_block_with_language() {
        let nodes = code_nodes("Intro\n\n```python\nprint(1)\n```\n");

        assert_eq!(
            nodes,
            vec![CodeNode::new(
                Some("language-python".to_string()),
                "print(1)\n"
            )]
        );
    }

    #[test]
    fn info_string_keeps_first_word_only() {
        let nodes = code_nodes("```rust ignore\nfn f() {}\n```\n");
        assert_eq!(nodes[0].class_name.as_deref(), Some("language-rust"));
    }

    #[test]
    fn fence_without_info_and_indented_block_have_no_class() {
        let nodes = code_nodes("```\nplain\n```\n\nText\n\n    indented\n");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].class_name, None);
        assert_eq!(nodes[0].text_content, "plain\n");
        assert_eq!(nodes[1].class_name, None);
        assert_eq!(nodes[1].text_content, "indented\n");
    }

    #[test]
    fn unclosed_fence_yields_streaming_block() {
        let markdown = format!("```python\nprint(1){CURSOR_SENTINEL}");
        let nodes = code_nodes(&markdown);

        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].text_content.contains(CURSOR_SENTINEL));
    }

    #[test]
    fn document_without_code_yields_nothing() {
        assert!(code_nodes("# Title\n\nJust prose.").is_empty());
    }
}
