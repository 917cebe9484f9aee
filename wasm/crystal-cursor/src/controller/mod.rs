//! The cursor effect controller.
//!
//! One controller owns every piece of cursor state: the pointer tracker, the
//! trail pool, the transient-effect registry and the active pointer style.
//! Host event handlers call the `pointer_*`/`hover_*` methods; the host's
//! per-frame callback calls [`CursorEffectController::tick`]. All visual
//! output goes through the [`Presenter`] the controller was built with.

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::CursorConfig;
use crate::effects::{EffectId, EffectRegistry};
use crate::error::{CursorError, Result};
use crate::geometry::{Point, Rect};
use crate::presenter::{MarkerFlag, Presenter};
use crate::pulse::MarkerPulse;
use crate::pointer::PointerTracker;
use crate::style::{glyph_for, HoverCategory, PointerStyleKind};
use crate::trail::TrailPool;


/// Render loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No pointer position yet, or `previous` not seeded.
    Uninitialized,
    /// Both positions known; the marker is interpolating.
    Tracking,
    /// `destroy()` ran. Every further call is a no-op.
    Terminated,
}

pub struct CursorEffectController<P: Presenter, R: Rng = StdRng> {
    config: CursorConfig,
    presenter: P,
    rng: R,
    pointer: PointerTracker,
    trail: TrailPool,
    effects: EffectRegistry,
    style: PointerStyleKind,
    terminated: bool,
}

impl<P: Presenter, R: Rng> CursorEffectController<P, R> {
    /// Install the cursor if the host supports hovering.
    ///
    /// On touch-only hosts this returns `Ok(None)` without building the
    /// presenter at all.
    pub fn install<F>(
        supports_hover: bool,
        config: CursorConfig,
        make_presenter: F,
        rng: R,
    ) -> Result<Option<Self>>
    where
        F: FnOnce() -> Result<P>,
    {
        if !supports_hover {
            info!("[CrystalCursor] Host has no hover capability, cursor not installed");
            return Ok(None);
        }
        Self::new(config, make_presenter()?, rng).map(Some)
    }

    /// Validate the config, build the trail pool and mount every persistent
    /// node.
    pub fn new(config: CursorConfig, mut presenter: P, mut rng: R) -> Result<Self> {
        config.validate()?;
        let trail = TrailPool::new(&config, &mut rng);
        presenter.mount(trail.len())?;
        info!(
            "[CrystalCursor] Mounted marker and {} trail particles",
            trail.len()
        );

        Ok(Self {
            pointer: PointerTracker::new(config.emit_interval_ms, config.follow_factor),
            trail,
            effects: EffectRegistry::new(),
            style: PointerStyleKind::Normal,
            terminated: false,
            config,
            presenter,
            rng,
        })
    }

    pub fn state(&self) -> LoopState {
        if self.terminated {
            LoopState::Terminated
        } else if self.pointer.is_tracking() {
            LoopState::Tracking
        } else {
            LoopState::Uninitialized
        }
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn trail(&self) -> &TrailPool {
        &self.trail
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn current_style(&self) -> PointerStyleKind {
        self.style
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Pointer moved to `client` (viewport coordinates).
    pub fn pointer_move(&mut self, now_ms: f64, client: Point) {
        if self.terminated {
            return;
        }
        let outcome = self.pointer.record_move(now_ms, client);
        if outcome.first {
            let top_left = self.marker_top_left(client);
            best_effort(self.presenter.move_marker(top_left), "snap marker");
        }
        if outcome.emit {
            self.activate_trail();
        }
        best_effort(
            self.presenter.set_marker_flag(MarkerFlag::Hidden, false),
            "show marker",
        );
    }

    /// Pointer button pressed at `client`; `scroll` converts to document
    /// coordinates.
    pub fn pointer_down(&mut self, now_ms: f64, client: Point, scroll: Point) {
        if self.terminated {
            return;
        }
        best_effort(
            self.presenter.set_marker_flag(MarkerFlag::Active, true),
            "set active",
        );
        let origin = client + scroll;
        let mut spawned = self
            .effects
            .spawn_burst(origin, now_ms, &self.config, &mut self.rng);
        spawned.push(self.effects.spawn_shockwave(origin, now_ms, &self.config));
        debug!(
            "[CrystalCursor] Burst of {} effects at ({:.1}, {:.1})",
            spawned.len(),
            origin.x,
            origin.y
        );
        self.mount_effects(&spawned);
    }

    pub fn pointer_up(&mut self) {
        if self.terminated {
            return;
        }
        best_effort(
            self.presenter.set_marker_flag(MarkerFlag::Active, false),
            "clear active",
        );
    }

    /// Pointer entered the page.
    pub fn document_enter(&mut self) {
        if self.terminated {
            return;
        }
        best_effort(
            self.presenter.set_marker_flag(MarkerFlag::Hidden, false),
            "show marker",
        );
    }

    /// Pointer left the page.
    pub fn document_leave(&mut self) {
        if self.terminated {
            return;
        }
        best_effort(
            self.presenter.set_marker_flag(MarkerFlag::Hidden, true),
            "hide marker",
        );
    }

    /// Pointer entered an element of `category` whose client box is `rect`.
    pub fn hover_enter(&mut self, now_ms: f64, category: HoverCategory, rect: Rect, scroll: Point) {
        if self.terminated {
            return;
        }
        self.set_pointer(category.style());
        if category.is_interactive() {
            best_effort(
                self.presenter.set_marker_flag(MarkerFlag::Hover, true),
                "set hover",
            );
            let id = self
                .effects
                .spawn_ripple(rect.center() + scroll, now_ms, &self.config);
            self.mount_effects(&[id]);
        }
    }

    /// Pointer left an element of `category`. Always reverts to `Normal`.
    pub fn hover_leave(&mut self, category: HoverCategory) {
        if self.terminated {
            return;
        }
        self.set_pointer(PointerStyleKind::Normal);
        if category.is_interactive() {
            best_effort(
                self.presenter.set_marker_flag(MarkerFlag::Hover, false),
                "clear hover",
            );
        }
    }

    /// Switch the page-wide pointer glyph.
    pub fn set_pointer(&mut self, kind: PointerStyleKind) {
        if self.terminated {
            return;
        }
        if kind != self.style {
            debug!("[CrystalCursor] Pointer style {} -> {}", self.style, kind);
        }
        self.style = kind;
        let glyph = glyph_for(kind, &self.config.glyph_asset_base);
        best_effort(
            self.presenter.set_pointer_glyph(Some(&glyph)),
            "set pointer glyph",
        );
    }

    /// One frame of the render loop.
    pub fn tick(&mut self, now_ms: f64) {
        if self.terminated {
            return;
        }

        if let Some(smoothed) = self.pointer.advance() {
            let top_left = self.marker_top_left(smoothed);
            best_effort(self.presenter.move_marker(top_left), "move marker");

            for index in self.trail.step() {
                let particle = &self.trail.particles()[index];
                best_effort(
                    self.presenter.update_trail(index, particle),
                    "update trail",
                );
            }

            best_effort(
                self.presenter.set_marker_pulse(&MarkerPulse::at(now_ms)),
                "pulse marker",
            );
        }

        let tick = self.effects.advance(now_ms, &self.config);
        for (id, frame) in &tick.frames {
            best_effort(self.presenter.update_effect(*id, frame), "update effect");
        }
        for id in tick.expired {
            trace!("[CrystalCursor] Effect {} expired", id);
            best_effort(self.presenter.remove_effect(id), "remove effect");
        }
    }

    /// Tear everything down: in-flight effects, persistent nodes and the
    /// pointer glyph override. Idempotent.
    pub fn destroy(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        let in_flight = self.effects.drain();
        for id in &in_flight {
            best_effort(self.presenter.remove_effect(*id), "remove effect");
        }
        self.trail.reset();
        best_effort(
            self.presenter.set_pointer_glyph(None),
            "clear pointer glyph",
        );
        best_effort(self.presenter.unmount(), "unmount");
        info!(
            "[CrystalCursor] Destroyed ({} in-flight effects cancelled)",
            in_flight.len()
        );
    }

    /// Fails with [`CursorError::Destroyed`] once torn down.
    pub fn ensure_alive(&self) -> Result<()> {
        if self.terminated {
            Err(CursorError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn marker_top_left(&self, center: Point) -> Point {
        let offset = self.config.marker_offset;
        center - Point::new(offset, offset)
    }

    fn activate_trail(&mut self) {
        let Some(origin) = self.pointer.previous() else {
            trace!("[CrystalCursor] No smoothed position yet, trail skipped");
            return;
        };
        let angle = self.pointer.angle();
        match self
            .trail
            .activate(origin, angle, &self.config, &mut self.rng)
        {
            Some(index) => {
                let particle = &self.trail.particles()[index];
                best_effort(
                    self.presenter.activate_trail(index, particle),
                    "activate trail",
                );
            }
            None => trace!("[CrystalCursor] Trail pool exhausted"),
        }
    }

    fn mount_effects(&mut self, ids: &[EffectId]) {
        for id in ids {
            if let Some(effect) = self.effects.get(*id) {
                best_effort(self.presenter.spawn_effect(effect), "spawn effect");
            }
        }
    }
}

fn best_effort(result: Result<()>, what: &str) {
    if let Err(e) = result {
        warn!("[CrystalCursor] {} failed: {}", what, e);
    }
}
