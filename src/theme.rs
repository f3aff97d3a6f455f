//! Card and chrome colours, with optional overrides from the config file

use ratatui::style::Color;

use crate::config::ThemeConfig;
use crate::deck::Face;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub card_front: Color,  // Card background while asking
    pub card_back: Color,   // Card background while answering
    pub text_front: Color,
    pub text_back: Color,
    pub accent: Color,      // Orientation label, key hints, switch button
    pub success: Color,     // Known button
    pub danger: Color,      // Unknown button, errors
    pub text: Color,
    pub text_dim: Color,
    pub inactive: Color,    // Borders
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            card_front: Color::Rgb(255, 255, 255),
            card_back: Color::Rgb(145, 194, 175),   // #91C2AF
            text_front: Color::Rgb(43, 43, 43),
            text_back: Color::Rgb(255, 255, 255),
            accent: Color::Rgb(177, 221, 198),      // #B1DDC6
            success: Color::Rgb(166, 218, 149),
            danger: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            inactive: Color::Rgb(88, 91, 112),
        }
    }
}

impl Theme {
    /// Default colours with any valid overrides from the config applied
    pub fn load(config: &ThemeConfig) -> Self {
        let mut theme = Self::default();

        let overrides = [
            ("card_front", &config.card_front, &mut theme.card_front),
            ("card_back", &config.card_back, &mut theme.card_back),
            ("text_front", &config.text_front, &mut theme.text_front),
            ("text_back", &config.text_back, &mut theme.text_back),
            ("accent", &config.accent, &mut theme.accent),
        ];

        for (name, value, slot) in overrides {
            let Some(value) = value else { continue };
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring theme.{}: {:?} is not a hex color", name, value),
            }
        }

        theme
    }

    /// (background, foreground) for a card face
    pub fn face(&self, face: Face) -> (Color, Color) {
        match face {
            Face::Front => (self.card_front, self.text_front),
            Face::Back => (self.card_back, self.text_back),
        }
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#B1DDC6"), Some(Color::Rgb(177, 221, 198)));
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#zzzzzz"), None);
        assert_eq!(Theme::parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_overrides_apply_and_bad_values_are_ignored() {
        let config = ThemeConfig {
            card_front: Some("#000000".to_string()),
            card_back: Some("green-ish".to_string()),
            ..Default::default()
        };
        let theme = Theme::load(&config);
        assert_eq!(theme.card_front, Color::Rgb(0, 0, 0));
        assert_eq!(theme.card_back, Theme::default().card_back);
        assert_eq!(theme.face(Face::Front).0, Color::Rgb(0, 0, 0));
    }
}
