use codeview_engine::{Body, RenderedBlock, Rgb, SpanStyle};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::App;

pub const CURSOR_GLYPH: &str = "▍";

pub fn draw(f: &mut Frame, app: &App, blocks: &[RenderedBlock]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_offset = 0;
    for (index, block) in blocks.iter().enumerate() {
        if index == app.selected() {
            selected_offset = lines.len();
        }
        lines.extend(block_lines(block, index == app.selected()));
        lines.push(Line::default());
    }
    if blocks.is_empty() {
        lines.push(Line::from("No code blocks yet"));
    }

    let title = if app.is_streaming() {
        "Code blocks (streaming)"
    } else {
        "Code blocks"
    };
    let scroll = u16::try_from(selected_offset).unwrap_or(u16::MAX);
    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll, 0));
    f.render_widget(content, chunks[0]);

    let mut help = vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Select | "),
        Span::raw("c: Copy | "),
        Span::raw("t: Theme | "),
        Span::raw("s: Finish stream"),
    ];
    if let Some(status) = app.status() {
        help.push(Span::styled(
            format!("  {status}"),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(help)), chunks[1]);
}

/// Terminal lines for one rendered block, header first.
pub fn block_lines(block: &RenderedBlock, selected: bool) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(color(block.header.foreground))
        .bg(color(block.header.background));
    let marker = if selected { "▶ " } else { "  " };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{marker}{}", block.header.label), header_style),
        Span::styled("  [c] copy", header_style.add_modifier(Modifier::DIM)),
    ])];

    match &block.body {
        Body::Highlighted {
            segments, cursor, ..
        } => {
            let mut current: Vec<Span<'static>> = Vec::new();
            for segment in segments {
                let style = span_style(&segment.style);
                for (i, part) in segment.text.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(Line::from(std::mem::take(&mut current)));
                    }
                    if !part.is_empty() {
                        current.push(Span::styled(part.to_string(), style));
                    }
                }
            }
            if *cursor {
                current.push(Span::styled(
                    CURSOR_GLYPH,
                    Style::default().add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            if !current.is_empty() {
                lines.push(Line::from(current));
            }
        }
        Body::Raw { text, background } => {
            let style = Style::default().bg(color(*background));
            lines.extend(
                text.lines()
                    .map(|line| Line::from(Span::styled(line.to_string(), style))),
            );
        }
    }

    lines
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn span_style(style: &SpanStyle) -> Style {
    let mut out = Style::default();
    if let Some(fg) = style.foreground {
        out = out.fg(color(fg));
    }
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.underline {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeview_engine::{
        CURSOR_SENTINEL, CodeBlockRenderer, CodeBlockView, CodeNode, ColorScheme,
        SyntectHighlighter,
    };
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| &*s.content).collect()
    }

    fn render(node: CodeNode, scheme: ColorScheme) -> RenderedBlock {
        let renderer = CodeBlockRenderer::new(SyntectHighlighter::for_scheme(scheme).unwrap());
        let (rendered, _) = CodeBlockView::new()
            .render(&renderer, &node, scheme)
            .unwrap();
        rendered
    }

    #[test]
    fn streaming_block_ends_with_cursor() {
        let block = render(
            CodeNode::with_language("python", format!("a = 1\nb = 2{CURSOR_SENTINEL}")),
            ColorScheme::Dark,
        );

        let lines = block_lines(&block, false);

        assert_eq!(line_text(&lines[0]), "  python  [c] copy");
        assert_eq!(line_text(&lines[1]), "a = 1");
        assert_eq!(line_text(&lines[2]), format!("b = 2{CURSOR_GLYPH}"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn raw_block_uses_surface_background() {
        let block = render(CodeNode::untagged("ls\npwd"), ColorScheme::Light);

        let lines = block_lines(&block, true);

        assert_eq!(line_text(&lines[0]), "▶ Raw code  [c] copy");
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1].spans[0].style.bg,
            Some(Color::Rgb(0xee, 0xee, 0xee))
        );
    }

    #[test]
    fn finished_block_has_no_cursor_or_trailing_blank() {
        let block = render(
            CodeNode::with_language("rust", "fn main() {}\n"),
            ColorScheme::Light,
        );

        let lines = block_lines(&block, false);

        assert_eq!(lines.len(), 2);
        assert!(!line_text(&lines[1]).contains(CURSOR_GLYPH));
    }
}
