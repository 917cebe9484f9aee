//! Pointer glyph selection.
//!
//! [`PointerStyleKind`] names the logical cursor; [`glyph_for`] turns it into
//! a CSS `cursor` value. [`HoverCategory`] maps the four element categories
//! the cursor listens on to the style they switch to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerStyleKind {
    #[default]
    Normal,
    Link,
    Text,
    Move,
    Help,
    Unavailable,
    Busy,
    Working,
    Precision,
}

impl PointerStyleKind {
    pub const ALL: [PointerStyleKind; 9] = [
        PointerStyleKind::Normal,
        PointerStyleKind::Link,
        PointerStyleKind::Text,
        PointerStyleKind::Move,
        PointerStyleKind::Help,
        PointerStyleKind::Unavailable,
        PointerStyleKind::Busy,
        PointerStyleKind::Working,
        PointerStyleKind::Precision,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PointerStyleKind::Normal => "normal",
            PointerStyleKind::Link => "link",
            PointerStyleKind::Text => "text",
            PointerStyleKind::Move => "move",
            PointerStyleKind::Help => "help",
            PointerStyleKind::Unavailable => "unavailable",
            PointerStyleKind::Busy => "busy",
            PointerStyleKind::Working => "working",
            PointerStyleKind::Precision => "precision",
        }
    }

    /// Look up a style by key, falling back to `Normal` for anything unknown.
    pub fn from_key(key: &str) -> PointerStyleKind {
        key.parse().unwrap_or_default()
    }

    /// Built-in CSS cursor used when the glyph file fails to load.
    pub fn system_fallback(&self) -> &'static str {
        match self {
            PointerStyleKind::Normal => "default",
            PointerStyleKind::Link => "pointer",
            PointerStyleKind::Text => "text",
            PointerStyleKind::Move => "move",
            PointerStyleKind::Help => "help",
            PointerStyleKind::Unavailable => "not-allowed",
            PointerStyleKind::Busy => "wait",
            PointerStyleKind::Working => "progress",
            PointerStyleKind::Precision => "crosshair",
        }
    }

    /// Animated cursors ship as `.ani`, static ones as `.cur`.
    fn glyph_extension(&self) -> &'static str {
        match self {
            PointerStyleKind::Busy | PointerStyleKind::Working => "ani",
            _ => "cur",
        }
    }
}

impl fmt::Display for PointerStyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl FromStr for PointerStyleKind {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PointerStyleKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// CSS `cursor` value for `kind`, e.g. `url(/img/link.cur), pointer`.
pub fn glyph_for(kind: PointerStyleKind, asset_base: &str) -> String {
    format!(
        "url({}/{}.{}), {}",
        asset_base.trim_end_matches('/'),
        kind.key(),
        kind.glyph_extension(),
        kind.system_fallback()
    )
}

/// Element categories the cursor reacts to on hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverCategory {
    /// Links, buttons and elements flagged `data-hover`.
    Interactive,
    TextInput,
    Disabled,
    Draggable,
}

impl HoverCategory {
    pub const ALL: [HoverCategory; 4] = [
        HoverCategory::Interactive,
        HoverCategory::TextInput,
        HoverCategory::Disabled,
        HoverCategory::Draggable,
    ];

    /// CSS selector matching the category's elements.
    pub fn selector(&self) -> &'static str {
        match self {
            HoverCategory::Interactive => "a, button, [data-hover]",
            HoverCategory::TextInput => "input, textarea, [contenteditable]",
            HoverCategory::Disabled => "[disabled]",
            HoverCategory::Draggable => "[draggable=\"true\"]",
        }
    }

    /// Style applied while the pointer is over an element of this category.
    pub fn style(&self) -> PointerStyleKind {
        match self {
            HoverCategory::Interactive => PointerStyleKind::Link,
            HoverCategory::TextInput => PointerStyleKind::Text,
            HoverCategory::Disabled => PointerStyleKind::Unavailable,
            HoverCategory::Draggable => PointerStyleKind::Move,
        }
    }

    /// Interactive elements also light up the marker and spawn a ripple.
    pub fn is_interactive(&self) -> bool {
        matches!(self, HoverCategory::Interactive)
    }
}
