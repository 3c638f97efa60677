//! TUI theme and styles

use crossterm::style::{Attribute, Attributes, Color, ContentStyle};

/// Application color theme
pub struct Theme;

impl Theme {
    /// Primary accent color
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent color
    pub const SECONDARY: Color = Color::Yellow;

    /// Success color
    pub const SUCCESS: Color = Color::Green;

    /// Error color
    pub const ERROR: Color = Color::Red;

    /// Muted text color
    pub const MUTED: Color = Color::DarkGrey;

    /// Header style
    pub fn header() -> ContentStyle {
        fg(Self::PRIMARY, Some(Attribute::Bold))
    }

    /// Row under the cursor
    pub fn cursor() -> ContentStyle {
        ContentStyle {
            background_color: Some(Self::PRIMARY),
            ..fg(Color::Black, None)
        }
    }

    /// Selected (but not focused) row
    pub fn selected() -> ContentStyle {
        fg(Self::SECONDARY, None)
    }

    /// Normal text style
    pub fn normal() -> ContentStyle {
        ContentStyle::new()
    }

    /// Muted text style
    pub fn muted() -> ContentStyle {
        fg(Self::MUTED, None)
    }

    /// Status line after a successful action
    pub fn success() -> ContentStyle {
        fg(Self::SUCCESS, None)
    }

    /// Status line after a cancelled action
    pub fn notice() -> ContentStyle {
        fg(Self::SECONDARY, None)
    }

    /// Status line after a failed action
    pub fn error() -> ContentStyle {
        fg(Self::ERROR, None)
    }

    /// Warnings and destructive prompts
    pub fn warning() -> ContentStyle {
        fg(Self::ERROR, Some(Attribute::Bold))
    }
}

fn fg(color: Color, attribute: Option<Attribute>) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        attributes: attribute.map(Attributes::from).unwrap_or_default(),
        ..ContentStyle::default()
    }
}
