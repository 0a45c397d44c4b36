use ratatui::style::Color;
use tracing::warn;

/// Runtime theme with configurable colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Palette colors
    pub yellow: Color,
    pub green: Color,
    pub aqua: Color,
    pub purple: Color,

    // Semantic colors
    pub accent: Color,
    pub heading: Color,
    pub bar_fill: Color,
    pub bar_empty: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}

impl Theme {
    /// Look up a built-in theme, falling back to Gruvbox Dark
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox-dark" | "gruvbox" => Self::gruvbox_dark(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            other => {
                warn!(theme = other, "Unknown theme, using gruvbox-dark");
                Self::gruvbox_dark()
            }
        }
    }

    pub fn gruvbox_dark() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            green: Color::Rgb(0xa9, 0xb6, 0x65),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            purple: Color::Rgb(0xd3, 0x86, 0x9b),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            heading: Color::Rgb(0xe7, 0x8a, 0x4e),
            bar_fill: Color::Rgb(0xa9, 0xb6, 0x65),
            bar_empty: Color::Rgb(0x45, 0x40, 0x3d),
        }
    }

    pub fn nord() -> Self {
        Self {
            bg0: Color::Rgb(0x2e, 0x34, 0x40),
            bg1: Color::Rgb(0x3b, 0x42, 0x52),
            bg2: Color::Rgb(0x43, 0x4c, 0x5e),
            fg0: Color::Rgb(0xec, 0xef, 0xf4),
            fg1: Color::Rgb(0xe5, 0xe9, 0xf0),
            grey0: Color::Rgb(0x4c, 0x56, 0x6a),
            grey2: Color::Rgb(0xd8, 0xde, 0xe9),
            yellow: Color::Rgb(0xeb, 0xcb, 0x8b),
            green: Color::Rgb(0xa3, 0xbe, 0x8c),
            aqua: Color::Rgb(0x8f, 0xbc, 0xbb),
            purple: Color::Rgb(0x81, 0xa1, 0xc1),
            accent: Color::Rgb(0x88, 0xc0, 0xd0),
            heading: Color::Rgb(0xd0, 0x87, 0x70),
            bar_fill: Color::Rgb(0x8f, 0xbc, 0xbb),
            bar_empty: Color::Rgb(0x43, 0x4c, 0x5e),
        }
    }

    pub fn dracula() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x2a, 0x36),
            bg1: Color::Rgb(0x21, 0x22, 0x2c),
            bg2: Color::Rgb(0x44, 0x47, 0x5a),
            fg0: Color::Rgb(0xf8, 0xf8, 0xf2),
            fg1: Color::Rgb(0xe9, 0xe9, 0xea),
            grey0: Color::Rgb(0x62, 0x72, 0xa4),
            grey2: Color::Rgb(0x7a, 0x7c, 0x8d),
            yellow: Color::Rgb(0xf1, 0xfa, 0x8c),
            green: Color::Rgb(0x50, 0xfa, 0x7b),
            aqua: Color::Rgb(0x8b, 0xe9, 0xfd),
            purple: Color::Rgb(0xff, 0x79, 0xc6),
            accent: Color::Rgb(0xbd, 0x93, 0xf9),
            heading: Color::Rgb(0xff, 0xb8, 0x6c),
            bar_fill: Color::Rgb(0x50, 0xfa, 0x7b),
            bar_empty: Color::Rgb(0x44, 0x47, 0x5a),
        }
    }

    /// `color` at `opacity` over the page background.
    ///
    /// Terminal colors have no alpha, so RGB colors are blended and named
    /// colors switch to the background below half opacity.
    pub fn fade(&self, color: Color, opacity: f64) -> Color {
        let opacity = opacity.clamp(0.0, 1.0);
        match (color, self.bg0) {
            (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
                let mix = |c: u8, base: u8| {
                    (f64::from(base) + (f64::from(c) - f64::from(base)) * opacity).round() as u8
                };
                Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
            }
            _ if opacity < 0.5 => self.bg0,
            _ => color,
        }
    }
}
