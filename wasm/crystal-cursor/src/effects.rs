//! Transient click and hover effects.
//!
//! Every effect lives in one [`EffectRegistry`] that the controller polls
//! once per frame. An effect's progress is `(now - spawned_at) / duration`;
//! it is dropped on the first poll where progress reaches 1. Nothing here
//! schedules its own callbacks, so tearing down the registry cancels every
//! in-flight effect.

use rand::Rng;

use crate::config::CursorConfig;
use crate::geometry::Point;

/// Stable handle for a spawned effect, used to address its visual node.
pub type EffectId = u64;

/// Parameters fixed when a crystal shard is spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct Shard {
    /// Travel direction in radians.
    pub angle: f64,
    pub velocity: f64,
    pub size: f64,
    /// Initial rotation in degrees.
    pub rotation_deg: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    /// One fragment of the pointer-down burst.
    CrystalShard(Shard),
    /// Expanding ring at the pointer-down point.
    Shockwave,
    /// Static marker over a hovered element, removed after a fixed delay.
    Ripple,
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::CrystalShard(_) => "crystal-burst",
            EffectKind::Shockwave => "shockwave",
            EffectKind::Ripple => "ripple-effect",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransientEffect {
    pub id: EffectId,
    /// Anchor in document coordinates.
    pub origin: Point,
    pub spawned_at_ms: f64,
    pub duration_ms: f64,
    pub kind: EffectKind,
}

/// Per-frame visual state of an animated effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectFrame {
    Shard {
        /// Translation from the origin.
        offset: Point,
        opacity: f64,
        scale: f64,
        rotation_deg: f64,
    },
    Shockwave {
        /// Rendered as the ring's box width and height.
        radius: f64,
        opacity: f64,
        border_width: f64,
    },
}

impl TransientEffect {
    /// Local progress, never negative. Reaches 1 at `spawned_at + duration`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.spawned_at_ms) / self.duration_ms).max(0.0)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Visual state at `now_ms`. Ripples have no animated state.
    pub fn frame(&self, now_ms: f64, config: &CursorConfig) -> Option<EffectFrame> {
        let progress = self.progress(now_ms).min(1.0);
        match &self.kind {
            EffectKind::CrystalShard(shard) => {
                let distance = shard.velocity * progress * config.shard_travel;
                Some(EffectFrame::Shard {
                    offset: Point::ZERO.offset_polar(shard.angle, distance),
                    opacity: 1.0 - progress,
                    scale: 0.5 + progress * 0.5,
                    rotation_deg: shard.rotation_deg + progress * 360.0,
                })
            }
            EffectKind::Shockwave => Some(EffectFrame::Shockwave {
                radius: progress * config.shockwave_radius,
                opacity: 1.0 - progress,
                border_width: 1.0 - progress,
            }),
            EffectKind::Ripple => None,
        }
    }
}

/// Outcome of polling the registry once.
#[derive(Debug, Default)]
pub struct EffectTick {
    pub frames: Vec<(EffectId, EffectFrame)>,
    /// Effects dropped this poll; their nodes should be removed.
    pub expired: Vec<EffectId>,
}

#[derive(Debug, Default)]
pub struct EffectRegistry {
    next_id: EffectId,
    effects: Vec<TransientEffect>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransientEffect> {
        self.effects.iter()
    }

    pub fn get(&self, id: EffectId) -> Option<&TransientEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    fn spawn(
        &mut self,
        origin: Point,
        now_ms: f64,
        duration_ms: f64,
        kind: EffectKind,
    ) -> EffectId {
        let id = self.next_id;
        self.next_id += 1;
        self.effects.push(TransientEffect {
            id,
            origin,
            spawned_at_ms: now_ms,
            duration_ms,
            kind,
        });
        id
    }

    /// Spawn `config.burst_count` shards at `origin`.
    pub fn spawn_burst<R: Rng>(
        &mut self,
        origin: Point,
        now_ms: f64,
        config: &CursorConfig,
        rng: &mut R,
    ) -> Vec<EffectId> {
        (0..config.burst_count)
            .map(|_| {
                let color = if config.burst_palette.is_empty() {
                    String::new()
                } else {
                    config.burst_palette[rng.gen_range(0..config.burst_palette.len())].clone()
                };
                let shard = Shard {
                    angle: rng.gen_range(0.0..std::f64::consts::TAU),
                    velocity: config.shard_velocity.sample(rng),
                    size: config.shard_size.sample(rng),
                    rotation_deg: rng.gen_range(0.0..360.0),
                    color,
                };
                let lifetime = config.shard_lifetime_ms.sample(rng);
                self.spawn(origin, now_ms, lifetime, EffectKind::CrystalShard(shard))
            })
            .collect()
    }

    pub fn spawn_shockwave(&mut self, origin: Point, now_ms: f64, config: &CursorConfig) -> EffectId {
        self.spawn(
            origin,
            now_ms,
            config.shockwave_duration_ms,
            EffectKind::Shockwave,
        )
    }

    pub fn spawn_ripple(&mut self, origin: Point, now_ms: f64, config: &CursorConfig) -> EffectId {
        self.spawn(origin, now_ms, config.ripple_duration_ms, EffectKind::Ripple)
    }

    /// Drop expired effects and compute frames for the rest.
    pub fn advance(&mut self, now_ms: f64, config: &CursorConfig) -> EffectTick {
        let mut tick = EffectTick::default();
        self.effects.retain(|effect| {
            if effect.is_expired(now_ms) {
                tick.expired.push(effect.id);
                return false;
            }
            if let Some(frame) = effect.frame(now_ms, config) {
                tick.frames.push((effect.id, frame));
            }
            true
        });
        tick
    }

    /// Remove every effect, returning their ids.
    pub fn drain(&mut self) -> Vec<EffectId> {
        self.effects.drain(..).map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_burst_parameters_in_range() {
        let config = CursorConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut registry = EffectRegistry::new();
        let ids = registry.spawn_burst(Point::new(100.0, 150.0), 0.0, &config, &mut rng);
        assert_eq!(ids.len(), 50);
        assert_eq!(registry.len(), 50);

        for effect in registry.iter() {
            assert_eq!(effect.origin, Point::new(100.0, 150.0));
            assert!((800.0..1200.0).contains(&effect.duration_ms));
            let EffectKind::CrystalShard(shard) = &effect.kind else {
                panic!("expected shard, got {:?}", effect.kind);
            };
            assert!((0.0..std::f64::consts::TAU).contains(&shard.angle));
            assert!((0.5..2.5).contains(&shard.velocity));
            assert!((2.0..14.0).contains(&shard.size));
            assert!(config.burst_palette.contains(&shard.color));
        }
    }

    #[test]
    fn test_shard_frame() {
        let config = CursorConfig::default();
        let effect = TransientEffect {
            id: 0,
            origin: Point::ZERO,
            spawned_at_ms: 1000.0,
            duration_ms: 1000.0,
            kind: EffectKind::CrystalShard(Shard {
                angle: 0.0,
                velocity: 2.0,
                size: 4.0,
                rotation_deg: 30.0,
                color: "#8a2be2".into(),
            }),
        };
        let Some(EffectFrame::Shard {
            offset,
            opacity,
            scale,
            rotation_deg,
        }) = effect.frame(1500.0, &config)
        else {
            panic!("expected shard frame");
        };
        assert!((offset.x - 50.0).abs() < EPS);
        assert!(offset.y.abs() < EPS);
        assert!((opacity - 0.5).abs() < EPS);
        assert!((scale - 0.75).abs() < EPS);
        assert!((rotation_deg - 210.0).abs() < EPS);
    }

    #[test]
    fn test_shockwave_frame() {
        let config = CursorConfig::default();
        let mut registry = EffectRegistry::new();
        let id = registry.spawn_shockwave(Point::ZERO, 0.0, &config);
        let tick = registry.advance(150.0, &config);
        assert_eq!(tick.frames.len(), 1);
        let (frame_id, frame) = tick.frames[0];
        assert_eq!(frame_id, id);
        match frame {
            EffectFrame::Shockwave {
                radius,
                opacity,
                border_width,
            } => {
                assert!((radius - 12.5).abs() < EPS);
                assert!((opacity - 0.75).abs() < EPS);
                assert!((border_width - 0.75).abs() < EPS);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_ripple_expires_at_duration() {
        let config = CursorConfig::default();
        let mut registry = EffectRegistry::new();
        let id = registry.spawn_ripple(Point::new(25.0, 40.0), 500.0, &config);

        let tick = registry.advance(1499.0, &config);
        assert!(tick.frames.is_empty());
        assert!(tick.expired.is_empty());
        assert_eq!(registry.len(), 1);

        let tick = registry.advance(1500.0, &config);
        assert_eq!(tick.expired, vec![id]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clock_before_spawn_is_clamped() {
        let config = CursorConfig::default();
        let mut registry = EffectRegistry::new();
        registry.spawn_shockwave(Point::ZERO, 100.0, &config);
        let effect = registry.iter().next().unwrap();
        assert_eq!(effect.progress(50.0), 0.0);
    }

    #[test]
    fn test_drain_and_unique_ids() {
        let config = CursorConfig::default();
        let mut registry = EffectRegistry::new();
        let a = registry.spawn_shockwave(Point::ZERO, 0.0, &config);
        let b = registry.spawn_ripple(Point::ZERO, 0.0, &config);
        assert_ne!(a, b);
        assert_eq!(registry.drain(), vec![a, b]);
        assert!(registry.is_empty());
        let c = registry.spawn_shockwave(Point::ZERO, 0.0, &config);
        assert!(c > b);
    }
}
