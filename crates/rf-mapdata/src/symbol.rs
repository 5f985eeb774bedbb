//! Tile symbols and colors

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Vertical line drawing symbol
pub const LINE_XOXO: char = '│';
/// Horizontal line drawing symbol
pub const LINE_OXOX: char = '─';

/// Parse one symbol entry: a single character or a line-drawing name
pub fn symbol_from_string(s: &str) -> Result<char, String> {
    match s {
        "LINE_XOXO" => Ok(LINE_XOXO),
        "LINE_OXOX" => Ok(LINE_OXOX),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!(
                    "symbol \"{}\" must be exactly 1 character long",
                    s
                )),
            }
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Unset,
    Black,
    White,
    LightGray,
    DarkGray,
    Red,
    LightRed,
    Green,
    LightGreen,
    Blue,
    LightBlue,
    Cyan,
    LightCyan,
    Magenta,
    Pink,
    Brown,
    Yellow,
}

/// How a color is applied to the symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorLayer {
    #[default]
    Foreground,
    /// `i_` prefix: swapped foreground and background
    Inverted,
    /// `bgcolor` member
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileColor {
    pub color: Color,
    pub layer: ColorLayer,
}

impl TileColor {
    /// Parse a `color` entry such as `c_light_gray` or `i_red`
    pub fn from_color_string(s: &str) -> Result<Self, String> {
        let (layer, name) = if let Some(rest) = s.strip_prefix("i_") {
            (ColorLayer::Inverted, rest)
        } else {
            (ColorLayer::Foreground, s.strip_prefix("c_").unwrap_or(s))
        };
        Self::parse_name(name, layer, s)
    }

    /// Parse a `bgcolor` entry
    pub fn from_bgcolor_string(s: &str) -> Result<Self, String> {
        let name = s.strip_prefix("c_").unwrap_or(s);
        Self::parse_name(name, ColorLayer::Background, s)
    }

    fn parse_name(name: &str, layer: ColorLayer, original: &str) -> Result<Self, String> {
        Color::from_str(name)
            .map(|color| TileColor { color, layer })
            .map_err(|_| format!("unknown color \"{}\"", original))
    }
}
