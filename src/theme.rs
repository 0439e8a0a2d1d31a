use std::collections::BTreeMap;
use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use tracing::warn;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Installs the theme built from config. Only the first call has an effect.
pub fn install(theme: Theme) {
    let _ = THEME.set(theme);
}

/// The active theme, or the default one until [`install`] runs.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Brand color of the web client; also the fallback session color.
pub const BRAND: Color = Color::Rgb(0x66, 0x7e, 0xea);
const BRAND_DARK: Color = Color::Rgb(0x76, 0x4b, 0xa2);

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub error: Style,
    pub success: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::institutional()
    }
}

impl Theme {
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "institucional" | "default" => Some(Self::institutional()),
            "terminal" => Some(Self::terminal()),
            "alto-contraste" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// Purple-blue palette of the web dashboard.
    fn institutional() -> Self {
        let bold = Modifier::BOLD;
        Self {
            name: "institucional".to_string(),
            today: Style::new().fg(Color::White).bg(BRAND_DARK).add_modifier(bold),
            selected: Style::new().fg(Color::White).bg(BRAND),
            header: Style::new().fg(BRAND).add_modifier(bold),
            dim: Style::new().fg(Color::DarkGray),
            border: Style::new().fg(Color::Rgb(0x4a, 0x55, 0x68)),
            status: Style::new().fg(Color::White).bg(Color::Rgb(0x2d, 0x37, 0x48)),
            highlight: Style::new().bg(Color::Rgb(0x2d, 0x37, 0x48)).add_modifier(bold),
            error: Style::new().fg(Color::White).bg(Color::Rgb(0xe5, 0x3e, 0x3e)),
            success: Style::new().fg(Color::Black).bg(Color::Rgb(0x48, 0xbb, 0x78)),
        }
    }

    /// Only the 16 ANSI colors, for terminals without truecolor.
    fn terminal() -> Self {
        Self {
            name: "terminal".to_string(),
            today: Style::new().fg(Color::Black).bg(Color::Yellow),
            selected: Style::new().fg(Color::Black).bg(Color::Cyan),
            header: Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::new().fg(Color::DarkGray),
            border: Style::new().fg(Color::Gray),
            status: Style::new().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            error: Style::new().fg(Color::White).bg(Color::Red),
            success: Style::new().fg(Color::Black).bg(Color::Green),
        }
    }

    fn high_contrast() -> Self {
        let inverted = Style::new().fg(Color::Black).bg(Color::White);
        Self {
            name: "alto-contraste".to_string(),
            today: inverted.add_modifier(Modifier::BOLD),
            selected: inverted,
            header: Style::new().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            dim: Style::new().fg(Color::Gray),
            border: Style::new().fg(Color::White),
            status: inverted,
            highlight: Style::new().add_modifier(Modifier::REVERSED),
            error: Style::new().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
            success: Style::new().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut Style> {
        Some(match name {
            "today" => &mut self.today,
            "selected" => &mut self.selected,
            "header" => &mut self.header,
            "dim" => &mut self.dim,
            "border" => &mut self.border,
            "status" => &mut self.status,
            "highlight" => &mut self.highlight,
            "error" => &mut self.error,
            "success" => &mut self.success,
            _ => return None,
        })
    }

    /// Applies one `"<slot>.fg"` / `"<slot>.bg"` override.
    fn apply(&mut self, key: &str, color: Color) -> bool {
        let Some((slot, layer)) = key.split_once('.') else {
            return false;
        };
        let Some(style) = self.slot(slot) else {
            return false;
        };
        *style = match layer {
            "fg" => style.fg(color),
            "bg" => style.bg(color),
            _ => return false,
        };
        true
    }
}

/// The `[theme]` table of `config.toml`:
///
/// ```toml
/// [theme]
/// preset = "terminal"
/// colors = { "selected.bg" = "#334455", "today.fg" = "yellow" }
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub colors: BTreeMap<String, String>,
}

impl ThemeConfig {
    pub fn to_theme(&self) -> Theme {
        let mut theme = match self.preset.as_deref() {
            Some(name) => Theme::preset(name).unwrap_or_else(|| {
                warn!(preset = name, "unknown theme preset");
                Theme::default()
            }),
            None => Theme::default(),
        };

        for (key, raw) in &self.colors {
            let applied = parse_color(raw).is_some_and(|color| theme.apply(key, color));
            if !applied {
                warn!(key = %key, value = %raw, "ignoring theme override");
            }
        }
        theme
    }
}

/// `#rrggbb`, `#rgb` or a basic color name.
pub fn parse_color(raw: &str) -> Option<Color> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits[..] {
            [r, g, b] => Some(Color::Rgb(r * 17, g * 17, b * 17)),
            [r1, r2, g1, g2, b1, b2] => Some(Color::Rgb(r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2)),
            _ => None,
        };
    }
    let color = match raw.to_lowercase().as_str() {
        "black" | "negro" => Color::Black,
        "red" | "rojo" => Color::Red,
        "green" | "verde" => Color::Green,
        "yellow" | "amarillo" => Color::Yellow,
        "blue" | "azul" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" | "blanco" => Color::White,
        "gray" | "grey" | "gris" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#FF6B6B"), Some(Color::Rgb(255, 107, 107)));
        assert_eq!(parse_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_color(" gris "), Some(Color::Gray));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config = ThemeConfig {
            preset: Some("terminal".into()),
            colors: BTreeMap::from([
                ("today.bg".to_string(), "#000000".to_string()),
                ("today.underline".to_string(), "red".to_string()),
                ("nowhere.fg".to_string(), "red".to_string()),
            ]),
        };
        let theme = config.to_theme();
        assert_eq!(theme.name, "terminal");
        assert_eq!(theme.today.bg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(theme.today.fg, Some(Color::Black));
    }

    #[test]
    fn unknown_preset_falls_back() {
        let config = ThemeConfig {
            preset: Some("dracula".into()),
            ..ThemeConfig::default()
        };
        assert_eq!(config.to_theme().name, "institucional");
        assert_eq!(Theme::default().selected.bg, Some(BRAND));
    }
}
