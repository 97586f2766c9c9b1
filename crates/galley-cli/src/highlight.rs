use std::sync::OnceLock;

use galley_core::model::Message;
use galley_core::model::Role;
use galley_core::model::ToolCallStatus;
use galley_core::state::UiTheme;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

use crate::view::UiPalette;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn get_syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn get_theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn syntect_theme_name(theme: UiTheme) -> &'static str {
    match theme {
        UiTheme::Classic => "base16-ocean.dark",
        UiTheme::Cyberpunk => "base16-eighties.dark",
        UiTheme::NeonNoir => "base16-mocha.dark",
        UiTheme::SolarFlare => "Solarized (dark)",
        UiTheme::ForestZen => "base16-ocean.dark",
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Code { lang: &'a str, lines: Vec<&'a str> },
}

/// Splits message text on ``` fences. An unterminated fence runs to the end.
pub fn split_fenced(content: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut code: Option<(&str, Vec<&str>)> = None;
    for line in content.lines() {
        let fence = line.trim_start().strip_prefix("```");
        match (code.take(), fence) {
            (None, Some(lang)) => code = Some((lang.trim(), Vec::new())),
            (None, None) => segments.push(Segment::Text(line)),
            (Some((lang, lines)), Some(_)) => segments.push(Segment::Code { lang, lines }),
            (Some((lang, mut lines)), None) => {
                lines.push(line);
                code = Some((lang, lines));
            }
        }
    }
    if let Some((lang, lines)) = code {
        segments.push(Segment::Code { lang, lines });
    }
    segments
}

fn push_with_inline_code(out: &mut Vec<Line<'static>>, text: &str, base: Style, code: Style) {
    let mut spans = vec![Span::styled("  ".to_string(), base)];
    let mut code_mode = false;
    for (idx, part) in text.split('`').enumerate() {
        if idx > 0 {
            code_mode = !code_mode;
        }
        if part.is_empty() {
            continue;
        }
        let style = if code_mode { code } else { base };
        spans.push(Span::styled(part.to_string(), style));
    }
    out.push(Line::from(spans));
}

fn render_code_block(
    out: &mut Vec<Line<'static>>,
    lang: &str,
    lines: &[&str],
    theme: UiTheme,
    palette: UiPalette,
) {
    let fence = Style::default().fg(palette.muted);
    out.push(Line::from(Span::styled(format!("  ```{lang}"), fence)));

    let ps = get_syntax_set();
    let syntax = ps
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| ps.find_syntax_plain_text());
    let mut highlighter = get_theme_set()
        .themes
        .get(syntect_theme_name(theme))
        .map(|theme| HighlightLines::new(syntax, theme));

    for raw in lines {
        let mut spans = vec![Span::styled("  ".to_string(), fence)];
        let line = format!("{raw}\n");
        let ranges = highlighter
            .as_mut()
            .and_then(|h| h.highlight_line(&line, ps).ok());
        match ranges {
            Some(ranges) => {
                for (style, text) in ranges {
                    let text = text.trim_end_matches('\n');
                    if text.is_empty() {
                        continue;
                    }
                    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                    spans.push(Span::styled(
                        text.to_string(),
                        Style::default().fg(fg).bg(palette.selected_bg),
                    ));
                }
            }
            None => spans.push(Span::styled(
                raw.to_string(),
                Style::default()
                    .fg(palette.accent_alt)
                    .bg(palette.selected_bg),
            )),
        }
        out.push(Line::from(spans));
    }
    out.push(Line::from(Span::styled("  ```".to_string(), fence)));
}

pub fn message_lines(
    message: &Message,
    theme: UiTheme,
    palette: UiPalette,
    selected: bool,
) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    let role_color = match message.role {
        Role::User => palette.accent,
        Role::Assistant => palette.success,
    };
    let mut header = vec![
        Span::styled(
            if selected { "▶ " } else { "  " }.to_string(),
            Style::default().fg(palette.warning),
        ),
        Span::styled(
            message.role.label().to_string(),
            Style::default().fg(role_color).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(provider) = message.provider {
        header.push(Span::styled(
            format!(" · {}", provider.label()),
            Style::default().fg(palette.accent_alt),
        ));
    }
    header.push(Span::styled(
        format!("  {}", message.timestamp),
        Style::default().fg(palette.muted),
    ));
    out.push(Line::from(header));

    for call in &message.tool_calls {
        let (marker, color) = match call.status {
            ToolCallStatus::Running => ("…", palette.warning),
            ToolCallStatus::Done => ("✓", palette.success),
        };
        let target = call.file.as_deref().unwrap_or("");
        out.push(Line::from(Span::styled(
            format!("  {marker} {} {target}", call.name),
            Style::default().fg(color),
        )));
    }

    let base = Style::default().fg(Color::White);
    let code = Style::default()
        .fg(palette.accent_alt)
        .bg(palette.selected_bg);
    for segment in split_fenced(&message.content) {
        match segment {
            Segment::Text(text) => push_with_inline_code(&mut out, text, base, code),
            Segment::Code { lang, lines } => {
                render_code_block(&mut out, lang, &lines, theme, palette)
            }
        }
    }
    out.push(Line::from(""));
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fences_split_text_from_code() {
        let segments = split_fenced("Try this:\n```rust\nfn main() {}\n```\nDone.");
        assert_eq!(
            segments,
            vec![
                Segment::Text("Try this:"),
                Segment::Code {
                    lang: "rust",
                    lines: vec!["fn main() {}"],
                },
                Segment::Text("Done."),
            ]
        );
    }

    #[test]
    fn unterminated_fence_keeps_the_tail_as_code() {
        let segments = split_fenced("```\nlet x = 1;");
        assert_eq!(
            segments,
            vec![Segment::Code {
                lang: "",
                lines: vec!["let x = 1;"],
            }]
        );
    }

    #[test]
    fn inline_code_alternates_styles() {
        let base = Style::default();
        let code = Style::default().fg(Color::Cyan);
        let mut out = Vec::new();
        push_with_inline_code(&mut out, "run `cargo test` now", base, code);
        let styled: Vec<(String, Style)> = out[0]
            .spans
            .iter()
            .map(|span| (span.content.to_string(), span.style))
            .collect();
        assert_eq!(
            styled,
            vec![
                ("  ".to_string(), base),
                ("run ".to_string(), base),
                ("cargo test".to_string(), code),
                (" now".to_string(), base),
            ]
        );
    }
}
