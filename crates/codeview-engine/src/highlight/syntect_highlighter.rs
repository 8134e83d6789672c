use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::{AnnotatedContent, HighlightError, HighlightSpan, Highlighter, SpanStyle};
use crate::theme::{ColorScheme, Rgb};

pub const DEFAULT_LIGHT_THEME: &str = "base16-ocean.light";
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Highlighter backed by syntect's bundled syntaxes and themes.
///
/// Languages syntect does not know are annotated as plain text.
#[derive(Debug, Clone)]
pub struct SyntectHighlighter {
    theme: &'static Theme,
    theme_name: String,
}

impl SyntectHighlighter {
    pub fn new(theme_name: &str) -> Result<Self, HighlightError> {
        let theme = theme_set()
            .themes
            .get(theme_name)
            .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_string()))?;
        Ok(Self {
            theme,
            theme_name: theme_name.to_string(),
        })
    }

    /// Bundled default theme for the given scheme.
    pub fn for_scheme(scheme: ColorScheme) -> Result<Self, HighlightError> {
        match scheme {
            ColorScheme::Light => Self::new(DEFAULT_LIGHT_THEME),
            ColorScheme::Dark => Self::new(DEFAULT_DARK_THEME),
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn available_themes() -> Vec<&'static str> {
        theme_set().themes.keys().map(String::as_str).collect()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, language: &str, code: &str) -> Result<AnnotatedContent, HighlightError> {
        let syntaxes = syntax_set();
        let syntax = syntaxes
            .find_syntax_by_token(language)
            .unwrap_or_else(|| {
                log::debug!("No syntax for '{language}', highlighting as plain text");
                syntaxes.find_syntax_plain_text()
            });

        let mut lines = HighlightLines::new(syntax, self.theme);
        let mut spans = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges =
                lines
                    .highlight_line(line, syntaxes)
                    .map_err(|e| HighlightError::Engine {
                        language: language.to_string(),
                        message: e.to_string(),
                    })?;
            spans.extend(
                ranges
                    .into_iter()
                    .map(|(style, text)| HighlightSpan::styled(text, span_style(style))),
            );
        }

        Ok(AnnotatedContent::new(spans))
    }
}

fn span_style(style: Style) -> SpanStyle {
    let fg = style.foreground;
    SpanStyle {
        foreground: Some(Rgb::new(fg.r, fg.g, fg.b)),
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
        underline: style.font_style.contains(FontStyle::UNDERLINE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_is_rejected() {
        let err = SyntectHighlighter::new("no-such-theme").unwrap_err();
        assert!(matches!(err, HighlightError::UnknownTheme(name) if name == "no-such-theme"));
    }

    #[test]
    fn default_themes_are_bundled() {
        let themes = SyntectHighlighter::available_themes();
        assert!(themes.contains(&DEFAULT_LIGHT_THEME));
        assert!(themes.contains(&DEFAULT_DARK_THEME));
    }
}
