//! Fixed-size pool of trail particles.
//!
//! Particles are plain data. A particle with `life <= 0` is free; activation
//! reuses the first free slot and never allocates.

use rand::Rng;

use crate::config::CursorConfig;
use crate::geometry::Point;

/// Opacity of a freshly activated particle.
const ACTIVATION_OPACITY: f64 = 0.8;
/// Base tail length multiplier, grown by `TAIL_GROWTH * (1 - life)`.
const TAIL_BASE: f64 = 3.0;
const TAIL_GROWTH: f64 = 2.5;
/// Gradient end hue is shifted by this many degrees.
const GRADIENT_HUE_SHIFT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TrailParticle {
    pub position: Point,
    pub size: f64,
    /// Remaining life in `[0, 1]`; `<= 0` means the slot is free.
    pub life: f64,
    /// Decay speed, fixed for the lifetime of the pool.
    pub speed: f64,
    /// Travel direction in radians.
    pub angle: f64,
    /// Hue in degrees, picked on activation.
    pub hue: f64,
}

impl TrailParticle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn opacity(&self) -> f64 {
        if self.is_alive() {
            self.life * ACTIVATION_OPACITY
        } else {
            0.0
        }
    }

    /// Tail length multiplier; the rendered height is `size * tail_length`.
    pub fn tail_length(&self) -> f64 {
        TAIL_BASE + (1.0 - self.life.max(0.0)) * TAIL_GROWTH
    }

    /// Rotation that points the tail along the travel direction.
    pub fn rotation(&self) -> f64 {
        self.angle + std::f64::consts::FRAC_PI_2
    }

    /// Hue pair for the head and tail of the gradient.
    pub fn gradient_hues(&self) -> (f64, f64) {
        (self.hue, self.hue + GRADIENT_HUE_SHIFT)
    }
}

#[derive(Debug, Clone)]
pub struct TrailPool {
    particles: Vec<TrailParticle>,
    decay: f64,
    drift: f64,
}

impl TrailPool {
    /// Pre-allocate `config.trail_length` free particles.
    pub fn new<R: Rng>(config: &CursorConfig, rng: &mut R) -> Self {
        let particles = (0..config.trail_length)
            .map(|_| TrailParticle {
                position: Point::ZERO,
                size: config.trail_initial_size.sample(rng),
                life: 0.0,
                speed: config.trail_speed.sample(rng),
                angle: 0.0,
                hue: config.trail_hue,
            })
            .collect();
        Self {
            particles,
            decay: config.trail_decay,
            drift: config.trail_drift,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[TrailParticle] {
        &self.particles
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    /// Reactivate the first free particle at `origin`, heading along `angle`.
    ///
    /// Returns the slot index, or `None` when every particle is still alive.
    pub fn activate<R: Rng>(
        &mut self,
        origin: Point,
        angle: f64,
        config: &CursorConfig,
        rng: &mut R,
    ) -> Option<usize> {
        let index = self.particles.iter().position(|p| !p.is_alive())?;
        let particle = &mut self.particles[index];
        particle.life = 1.0;
        particle.position = origin;
        particle.size = config.trail_size.sample(rng);
        particle.angle = angle;
        let spread = config.trail_hue_spread.abs();
        particle.hue = if spread > 0.0 {
            config.trail_hue + rng.gen_range(-spread..spread)
        } else {
            config.trail_hue
        };
        Some(index)
    }

    /// Advance every live particle one frame.
    ///
    /// Returns the indices that changed, so a presenter only touches those.
    pub fn step(&mut self) -> Vec<usize> {
        let mut changed = Vec::new();
        for (index, p) in self.particles.iter_mut().enumerate() {
            if !p.is_alive() {
                continue;
            }
            p.life -= p.speed * self.decay;
            let distance = (1.0 - p.life) * self.drift;
            p.position = p.position.offset_polar(p.angle, distance);
            changed.push(index);
        }
        changed
    }

    /// Mark every particle free.
    pub fn reset(&mut self) {
        for p in &mut self.particles {
            p.life = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(len: usize) -> (TrailPool, CursorConfig, StdRng) {
        let config = CursorConfig {
            trail_length: len,
            ..CursorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let pool = TrailPool::new(&config, &mut rng);
        (pool, config, rng)
    }

    #[test]
    fn test_pool_starts_free() {
        let (pool, _, _) = pool(20);
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.alive_count(), 0);
        for p in pool.particles() {
            assert!((0.5..1.0).contains(&p.speed));
            assert!((1.0..2.5).contains(&p.size));
        }
    }

    #[test]
    fn test_activation_randomises_visuals() {
        let (mut pool, config, mut rng) = pool(4);
        let idx = pool
            .activate(Point::new(3.0, 4.0), 1.25, &config, &mut rng)
            .unwrap();
        assert_eq!(idx, 0);
        let p = &pool.particles()[0];
        assert_eq!(p.life, 1.0);
        assert_eq!(p.position, Point::new(3.0, 4.0));
        assert_eq!(p.angle, 1.25);
        assert!((1.0..3.0).contains(&p.size));
        assert!((255.0..285.0).contains(&p.hue));
        assert!((p.opacity() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_exhausted_pool_drops_activation() {
        let (mut pool, config, mut rng) = pool(3);
        for expected in 0..3 {
            assert_eq!(
                pool.activate(Point::ZERO, 0.0, &config, &mut rng),
                Some(expected)
            );
        }
        assert_eq!(pool.activate(Point::ZERO, 0.0, &config, &mut rng), None);
        assert_eq!(pool.alive_count(), 3);
    }

    #[test]
    fn test_life_decays_monotonically_until_free() {
        let (mut pool, config, mut rng) = pool(1);
        pool.activate(Point::ZERO, 0.0, &config, &mut rng);
        let mut last = pool.particles()[0].life;
        let mut frames = 0;
        while pool.particles()[0].is_alive() {
            assert_eq!(pool.step(), vec![0]);
            let life = pool.particles()[0].life;
            assert!(life < last);
            last = life;
            frames += 1;
            assert!(frames < 1000, "particle never expired");
        }
        // Speed in [0.5, 1.0) with decay 0.02 expires in roughly 50..100 frames
        assert!((50..=101).contains(&frames));
        assert_eq!(pool.particles()[0].opacity(), 0.0);

        // Freed slot is reusable, and dead particles are not stepped
        assert!(pool.step().is_empty());
        assert_eq!(pool.activate(Point::ZERO, 0.0, &config, &mut rng), Some(0));
    }

    #[test]
    fn test_particle_drifts_along_angle() {
        let (mut pool, config, mut rng) = pool(1);
        pool.activate(Point::new(10.0, 10.0), 0.0, &config, &mut rng);
        pool.step();
        let p = &pool.particles()[0];
        let expected = (1.0 - p.life) * config.trail_drift;
        assert!((p.position.x - (10.0 + expected)).abs() < 1e-9);
        assert!((p.position.y - 10.0).abs() < 1e-9);
        assert!(p.tail_length() > 3.0);
    }
}
