//! Crystal Cursor
//!
//! A moonlight-themed custom cursor for web pages: a glowing marker that
//! follows the pointer with smoothing, a pooled particle trail, crystal
//! bursts and shockwaves on click, ripples over interactive elements, and
//! pointer glyph switching by element category.
//!
//! The engine ([`controller`], [`pointer`], [`trail`], [`effects`], [`style`],
//! [`pulse`]) is plain Rust with no browser dependency; visuals go through
//! the [`presenter::Presenter`] trait. On `wasm32` the `dom` and `web`
//! modules provide the DOM presenter and the `CrystalCursor` JS class.

pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod pointer;
pub mod presenter;
pub mod pulse;
pub mod style;
pub mod trail;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::CursorConfig;
pub use controller::{CursorEffectController, LoopState};
pub use error::{CursorError, Result};
pub use geometry::{Point, Rect};
pub use presenter::{MarkerFlag, Presenter};
pub use style::{HoverCategory, PointerStyleKind};

#[cfg(target_arch = "wasm32")]
pub use web::CrystalCursor;
