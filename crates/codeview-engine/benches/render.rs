use codeview_engine::{
    CodeBlockRenderer, CodeBlockView, CodeNode, ColorScheme, StreamFeed, StreamState,
    SyntectHighlighter, code_nodes,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const SAMPLE: &str = r#"Answer:

```rust
use std::collections::HashMap;

fn count_words(text: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}
```
"#;

fn bench_rerender_highlighted(c: &mut Criterion) {
    let renderer = CodeBlockRenderer::new(
        SyntectHighlighter::for_scheme(ColorScheme::Dark).expect("bundled theme"),
    );
    let node = code_nodes(SAMPLE).remove(0);
    let mut view = CodeBlockView::new();
    view.render(&renderer, &node, ColorScheme::Dark)
        .expect("initial render");

    c.bench_function("rerender_highlighted_block", |b| {
        b.iter(|| view.render(&renderer, black_box(&node), ColorScheme::Dark))
    });
}

fn bench_streamed_document(c: &mut Criterion) {
    let renderer = CodeBlockRenderer::new(
        SyntectHighlighter::for_scheme(ColorScheme::Dark).expect("bundled theme"),
    );

    c.bench_function("stream_document_in_8_char_chunks", |b| {
        b.iter(|| {
            let mut feed = StreamFeed::new(SAMPLE, 8, &StreamState::new());
            let mut views: Vec<CodeBlockView> = Vec::new();
            loop {
                let nodes: Vec<CodeNode> = feed.code_nodes();
                views.resize_with(nodes.len().max(views.len()), CodeBlockView::new);
                for (view, node) in views.iter_mut().zip(&nodes) {
                    let _ = view.render(&renderer, node, ColorScheme::Dark);
                }
                if !feed.advance() {
                    break;
                }
            }
            views
        })
    });
}

criterion_group!(benches, bench_rerender_highlighted, bench_streamed_document);
criterion_main!(benches);
