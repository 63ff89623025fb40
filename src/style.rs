//! Style properties the wireframe color is read from, and CSS color parsing.

use crate::settings::{StyleSettings, Theme};

pub const WIREFRAME_COLOR_PROPERTY: &str = "--wireframe-color";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color value")]
    Empty,
    #[error("malformed hex color `{0}`")]
    Hex(String),
    #[error("malformed rgb() color `{0}`")]
    Function(String),
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

/// Source of named string-valued style properties.
pub trait StyleSource {
    fn property_value(&self, name: &str) -> Option<String>;

    fn background(&self) -> [f32; 3] {
        [0.0, 0.0, 0.0]
    }
}

/// Theme list with one active theme.
pub struct Stylesheet {
    themes: Vec<Theme>,
    active: usize,
}

impl Stylesheet {
    pub fn from_settings(settings: &StyleSettings) -> Self {
        let active = if settings.active_theme < settings.themes.len() {
            settings.active_theme
        } else {
            0
        };
        Self { themes: settings.themes.clone(), active }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_theme(&self) -> Option<&Theme> {
        self.themes.get(self.active)
    }

    /// Switch to the next theme, wrapping around. Returns the new active name.
    pub fn cycle(&mut self) -> Option<&str> {
        if self.themes.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.themes.len();
        self.active_theme().map(|t| t.name.as_str())
    }
}

impl StyleSource for Stylesheet {
    fn property_value(&self, name: &str) -> Option<String> {
        self.active_theme()?.properties.get(name).cloned()
    }

    fn background(&self) -> [f32; 3] {
        self.active_theme().map_or([0.0, 0.0, 0.0], |t| t.background)
    }
}

/// Tracks the last good color for a property so malformed values never
/// replace it. Each distinct bad value is logged once.
#[derive(Default)]
pub struct ColorProperty {
    last_rejected: Option<String>,
}

impl ColorProperty {
    pub fn resolve(&mut self, source: &impl StyleSource, name: &str, current: [f32; 3]) -> [f32; 3] {
        let Some(raw) = source.property_value(name) else {
            return current;
        };
        match parse_css_color(&raw) {
            Ok(color) => {
                self.last_rejected = None;
                color
            }
            Err(e) => {
                if self.last_rejected.as_deref() != Some(raw.as_str()) {
                    log::warn!("keeping previous {name}: {e}");
                    self.last_rejected = Some(raw);
                }
                current
            }
        }
    }
}

/// Parse a CSS color into normalized sRGB components.
pub fn parse_css_color(value: &str) -> Result<[f32; 3], ColorParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::Hex(value.to_string()));
    }

    let lower = value.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .or_else(|| lower.strip_prefix("rgba("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args).ok_or_else(|| ColorParseError::Function(value.to_string()));
    }

    named_color(&lower)
        .map(|[r, g, b]| [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
        .ok_or_else(|| ColorParseError::UnknownName(value.to_string()))
}

fn parse_hex(hex: &str) -> Option<[f32; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    match hex.len() {
        3 => {
            let mut out = [0.0; 3];
            for (i, c) in hex.chars().enumerate() {
                out[i] = channel(&format!("{c}{c}"))?;
            }
            Some(out)
        }
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<[f32; 3]> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c.is_whitespace() || c == '/')
        .filter(|s| !s.is_empty())
        .collect();
    // A fourth component is alpha; opacity comes from the shader settings.
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        let v = match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0,
            None => part.parse::<f32>().ok()? / 255.0,
        };
        *slot = v.clamp(0.0, 1.0);
    }
    Some(out)
}

fn named_color(name: &str) -> Option<[u8; 3]> {
    Some(match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "maroon" => [128, 0, 0],
        "olive" => [128, 128, 0],
        "navy" => [0, 0, 128],
        "purple" => [128, 0, 128],
        "teal" => [0, 128, 128],
        "orange" => [255, 165, 0],
        _ => return None,
    })
}

/// sRGB transfer function inverse, per channel.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Fixed(Option<&'static str>);

    impl StyleSource for Fixed {
        fn property_value(&self, _name: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_css_color("#ffffff"), Ok([1.0, 1.0, 1.0]));
        assert_eq!(parse_css_color("  #000  "), Ok([0.0, 0.0, 0.0]));
        assert_eq!(parse_css_color("#f00"), Ok([1.0, 0.0, 0.0]));
        let [r, g, b] = parse_css_color("#1A334d").unwrap();
        assert_eq!((r * 255.0).round(), 26.0);
        assert_eq!((g * 255.0).round(), 51.0);
        assert_eq!((b * 255.0).round(), 77.0);
    }

    #[test]
    fn parses_rgb_function() {
        assert_eq!(parse_css_color("rgb(255, 0, 255)"), Ok([1.0, 0.0, 1.0]));
        assert_eq!(parse_css_color("rgb(100% 0% 50%)"), Ok([1.0, 0.0, 0.5]));
        assert_eq!(parse_css_color("RGBA(0, 255, 0, 0.5)"), Ok([0.0, 1.0, 0.0]));
    }

    #[test]
    fn parses_names() {
        assert_eq!(parse_css_color("White"), Ok([1.0, 1.0, 1.0]));
        assert_eq!(parse_css_color("navy").map(|c| c[2]), Ok(128.0 / 255.0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_css_color(""), Err(ColorParseError::Empty));
        assert!(matches!(parse_css_color("#12345"), Err(ColorParseError::Hex(_))));
        assert!(matches!(parse_css_color("#gggggg"), Err(ColorParseError::Hex(_))));
        assert!(matches!(parse_css_color("rgb(1, 2)"), Err(ColorParseError::Function(_))));
        assert!(matches!(parse_css_color("notacolor"), Err(ColorParseError::UnknownName(_))));
    }

    #[test]
    fn malformed_or_missing_value_keeps_previous_color() {
        let mut prop = ColorProperty::default();
        let previous = [0.2, 0.4, 0.6];
        assert_eq!(prop.resolve(&Fixed(Some("bogus")), WIREFRAME_COLOR_PROPERTY, previous), previous);
        assert_eq!(prop.resolve(&Fixed(None), WIREFRAME_COLOR_PROPERTY, previous), previous);
        assert_eq!(
            prop.resolve(&Fixed(Some("#000000")), WIREFRAME_COLOR_PROPERTY, previous),
            [0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn stylesheet_cycles_themes() {
        let mut sheet = Stylesheet::from_settings(&StyleSettings::default());
        assert_eq!(sheet.property_value(WIREFRAME_COLOR_PROPERTY).as_deref(), Some("#ffffff"));
        assert_eq!(sheet.cycle(), Some("light"));
        assert_eq!(sheet.property_value(WIREFRAME_COLOR_PROPERTY).as_deref(), Some("#1a1a1a"));
        assert_eq!(sheet.background(), [1.0, 1.0, 1.0]);
        assert_eq!(sheet.cycle(), Some("dark"));
        assert_eq!(sheet.active_index(), 0);
    }

    #[test]
    fn out_of_range_active_theme_falls_back_to_first() {
        let settings = StyleSettings {
            active_theme: 9,
            themes: vec![Theme {
                name: "only".into(),
                properties: BTreeMap::new(),
                background: [0.5, 0.5, 0.5],
            }],
        };
        let sheet = Stylesheet::from_settings(&settings);
        assert_eq!(sheet.active_index(), 0);
        assert_eq!(sheet.property_value(WIREFRAME_COLOR_PROPERTY), None);
    }

    #[test]
    fn srgb_endpoints_are_fixed() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!(srgb_to_linear(0.5) < 0.5);
    }
}
