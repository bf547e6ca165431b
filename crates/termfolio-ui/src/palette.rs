use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use termfolio_core::{Emphasis, RichText, ThemeColors};
use termfolio_shell::OutputEntry;

/// Terminal colors for one theme palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::Green,
            secondary: Color::DarkGray,
            accent: Color::LightGreen,
        }
    }
}

impl Palette {
    pub fn from_theme(colors: &ThemeColors) -> Self {
        let fallback = Self::default();
        Self {
            primary: parse_hex_color(&colors.primary).unwrap_or(fallback.primary),
            secondary: parse_hex_color(&colors.secondary).unwrap_or(fallback.secondary),
            accent: parse_hex_color(&colors.accent).unwrap_or(fallback.accent),
        }
    }

    pub fn style_for(&self, emphasis: &Emphasis) -> Style {
        match emphasis {
            Emphasis::Plain => Style::default().fg(self.primary),
            Emphasis::Highlight => Style::default()
                .fg(self.primary)
                .add_modifier(Modifier::BOLD),
            Emphasis::Accent => Style::default().fg(self.accent),
            Emphasis::Success => Style::default().fg(Color::Green),
            Emphasis::Warning => Style::default().fg(Color::Yellow),
            Emphasis::Error => Style::default().fg(Color::Red),
            Emphasis::Link(_) => Style::default()
                .fg(self.secondary)
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    pub fn lines(&self, text: &RichText) -> Vec<Line<'static>> {
        text.lines()
            .into_iter()
            .map(|segments| {
                Line::from(
                    segments
                        .into_iter()
                        .map(|segment| {
                            let style = self.style_for(&segment.emphasis);
                            Span::styled(segment.text, style)
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    pub fn entry_lines(&self, entry: &OutputEntry) -> Vec<Line<'static>> {
        match entry {
            OutputEntry::Command { prompt, line } => vec![Line::from(vec![
                Span::styled(
                    prompt.clone(),
                    Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
                ),
                Span::styled(line.clone(), Style::default().fg(self.primary)),
            ])],
            OutputEntry::Result { text } => self.lines(text),
        }
    }
}

/// `#rrggbb` or `#rgb` to an RGB terminal color.
pub fn parse_hex_color(raw: &str) -> Option<Color> {
    let hex = raw.trim().strip_prefix('#').filter(|hex| hex.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
            Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}
