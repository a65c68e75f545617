use ratatui::style::{Color, Modifier, Style};

use crate::cli::output::Tone;

/// Foreground of each built-in theme, in picker order
const PALETTE: &[(&str, &str)] = &[
    ("green", "#00FF00"),
    ("amber", "#FFB000"),
    ("cyan", "#00FFFF"),
];

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    pub bright: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::named("green")
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// The same hue at reduced intensity
fn dimmed(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (u16::from(c) * 55 / 100) as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}

impl Theme {
    /// A built-in theme by name; unknown names get the first theme
    pub fn named(name: &str) -> Self {
        let (name, hex) = PALETTE
            .iter()
            .find(|(n, _)| *n == name)
            .copied()
            .unwrap_or(PALETTE[0]);
        let foreground = parse_hex_color(hex).unwrap_or(Color::Green);
        Theme {
            name: name.to_string(),
            background: Color::Rgb(0x00, 0x00, 0x00),
            foreground,
            bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: dimmed(foreground),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    /// Style for a semantic output tone
    pub fn tone_style(&self, tone: Tone) -> Style {
        let base = self.base();
        match tone {
            Tone::Normal => base,
            Tone::System | Tone::Heading | Tone::Prompt => base.add_modifier(Modifier::BOLD),
            Tone::Info => base.fg(self.bright),
            Tone::Error => base.fg(self.red).add_modifier(Modifier::BOLD),
            Tone::Dim => base.fg(self.dim),
            Tone::Tag => base.fg(self.bright).add_modifier(Modifier::ITALIC),
            Tone::Done => base.fg(self.dim).add_modifier(Modifier::CROSSED_OUT),
            Tone::Priority => base.fg(self.yellow).add_modifier(Modifier::BOLD),
        }
    }
}
