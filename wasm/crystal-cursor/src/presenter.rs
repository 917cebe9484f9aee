//! Presentation layer seam.
//!
//! The controller owns all state and pushes visual changes through a
//! [`Presenter`]. The browser implementation is `dom::DomPresenter`;
//! tests record the calls instead.

use crate::effects::{EffectFrame, EffectId, TransientEffect};
use crate::error::Result;
use crate::geometry::Point;
use crate::pulse::MarkerPulse;
use crate::trail::TrailParticle;

/// Boolean visual states toggled on the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerFlag {
    /// Marker is hidden (before the first move, or pointer outside the page).
    Hidden,
    /// A pointer button is held.
    Active,
    /// Pointer is over an interactive element.
    Hover,
}

impl MarkerFlag {
    pub fn class_name(&self) -> &'static str {
        match self {
            MarkerFlag::Hidden => "hidden",
            MarkerFlag::Active => "active",
            MarkerFlag::Hover => "hover",
        }
    }
}

/// Everything the controller needs from a rendering target.
///
/// `mount` and `spawn_effect` may fail; the rest are per-frame updates the
/// controller treats as best effort.
pub trait Presenter {
    /// Create the marker (initially hidden) and `trail_count` trail nodes.
    fn mount(&mut self, trail_count: usize) -> Result<()>;

    /// Place the marker's top-left corner.
    fn move_marker(&mut self, top_left: Point) -> Result<()>;

    fn set_marker_flag(&mut self, flag: MarkerFlag, on: bool) -> Result<()>;

    fn set_marker_pulse(&mut self, pulse: &MarkerPulse) -> Result<()>;

    /// A pooled particle was (re)activated.
    fn activate_trail(&mut self, index: usize, particle: &TrailParticle) -> Result<()>;

    /// A live particle advanced one frame (or just expired).
    fn update_trail(&mut self, index: usize, particle: &TrailParticle) -> Result<()>;

    fn spawn_effect(&mut self, effect: &TransientEffect) -> Result<()>;

    fn update_effect(&mut self, id: EffectId, frame: &EffectFrame) -> Result<()>;

    fn remove_effect(&mut self, id: EffectId) -> Result<()>;

    /// Set the page-wide pointer glyph; `None` clears the override.
    fn set_pointer_glyph(&mut self, glyph: Option<&str>) -> Result<()>;

    /// Remove every node created by `mount`.
    fn unmount(&mut self) -> Result<()>;
}
