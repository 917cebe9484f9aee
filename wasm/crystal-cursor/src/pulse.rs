//! Time-driven glow and ring oscillators for the marker.
//!
//! Pure functions of wall-clock milliseconds; no phase is stored.

const GLOW_RATE: f64 = 0.003;
const GLOW_DEPTH: f64 = 0.3;
const GLOW_FLOOR: f64 = 0.7;

const RING_RATE: f64 = 0.002;
const RING_DEPTH: f64 = 0.2;
const RING_FLOOR: f64 = 0.8;
const RING_STEPS: [f64; 3] = [1.0, 1.1, 1.2];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPulse {
    /// Glow opacity in `[0.7, 1.0]`.
    pub glow: f64,
    /// Scale of the three concentric rings, innermost first.
    pub ring_scales: [f64; 3],
}

impl MarkerPulse {
    pub fn at(now_ms: f64) -> Self {
        let glow = (now_ms * GLOW_RATE).sin().abs() * GLOW_DEPTH + GLOW_FLOOR;
        let pulse = (now_ms * RING_RATE).sin().abs() * RING_DEPTH + RING_FLOOR;
        Self {
            glow,
            ring_scales: RING_STEPS.map(|step| pulse * step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_at_zero() {
        let pulse = MarkerPulse::at(0.0);
        assert!((pulse.glow - 0.7).abs() < 1e-12);
        assert!((pulse.ring_scales[0] - 0.8).abs() < 1e-12);
        assert!((pulse.ring_scales[2] - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_pulse_bounds() {
        for step in 0..2000 {
            let pulse = MarkerPulse::at(step as f64 * 7.3);
            assert!((0.7..=1.0).contains(&pulse.glow));
            assert!((0.8..=1.0).contains(&pulse.ring_scales[0]));
            assert!(pulse.ring_scales[0] < pulse.ring_scales[1]);
            assert!(pulse.ring_scales[1] < pulse.ring_scales[2]);
        }
    }

    #[test]
    fn test_glow_peaks_at_quarter_period() {
        let t = std::f64::consts::FRAC_PI_2 / GLOW_RATE;
        assert!((MarkerPulse::at(t).glow - 1.0).abs() < 1e-9);
    }
}
