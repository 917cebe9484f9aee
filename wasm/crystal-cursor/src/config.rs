//! Cursor configuration.
//!
//! Every tunable constant of the cursor lives here. The config is owned by
//! the controller instance; JavaScript callers may pass a partial object and
//! missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::{CursorError, Result};

/// Inclusive-exclusive numeric range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Sample uniformly. A degenerate range returns `min`.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && (self.max - self.min).is_finite()
            && self.min <= self.max
    }
}

/// Full cursor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CursorConfig {
    /// Number of pooled trail particles.
    pub trail_length: usize,
    /// Minimum spacing between trail emissions (ms).
    pub emit_interval_ms: f64,
    /// Fraction of the remaining distance the marker covers per frame.
    pub follow_factor: f64,
    /// Offset subtracted from the pointer so the marker is centred on it.
    pub marker_offset: f64,

    /// Per-frame life decrement is `speed * trail_decay`.
    pub trail_decay: f64,
    /// Per-frame drift is `(1 - life) * trail_drift`.
    pub trail_drift: f64,
    /// Per-particle decay speed, fixed when the pool is built.
    pub trail_speed: Range,
    /// Particle size before its first activation.
    pub trail_initial_size: Range,
    /// Particle size picked on each activation.
    pub trail_size: Range,
    /// Base hue of trail particles (degrees).
    pub trail_hue: f64,
    /// Hue jitter either side of `trail_hue`.
    pub trail_hue_spread: f64,

    /// Shards spawned per pointer-down.
    pub burst_count: usize,
    pub burst_palette: Vec<String>,
    pub shard_velocity: Range,
    pub shard_lifetime_ms: Range,
    pub shard_size: Range,
    /// Distance multiplier: offset is `velocity * progress * shard_travel`.
    pub shard_travel: f64,

    pub shockwave_duration_ms: f64,
    pub shockwave_radius: f64,

    pub ripple_duration_ms: f64,

    /// Base URL of the cursor glyph files.
    pub glyph_asset_base: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            trail_length: 20,
            emit_interval_ms: 16.0,
            follow_factor: 0.2,
            marker_offset: 6.0,

            trail_decay: 0.02,
            trail_drift: 1.5,
            trail_speed: Range::new(0.5, 1.0),
            trail_initial_size: Range::new(1.0, 2.5),
            trail_size: Range::new(1.0, 3.0),
            trail_hue: 270.0,
            trail_hue_spread: 15.0,

            burst_count: 50,
            burst_palette: ["#8a2be2", "#9932cc", "#ba55d3", "#da70d6", "#d8bfd8"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            shard_velocity: Range::new(0.5, 2.5),
            shard_lifetime_ms: Range::new(800.0, 1200.0),
            shard_size: Range::new(2.0, 14.0),
            shard_travel: 50.0,

            shockwave_duration_ms: 600.0,
            shockwave_radius: 50.0,

            ripple_duration_ms: 1000.0,

            glyph_asset_base: "/img".to_string(),
        }
    }
}

impl CursorConfig {
    /// Parse a (possibly partial) JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CursorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a (possibly partial) JS object. `undefined`/`null` yield defaults.
    pub fn from_js(value: wasm_bindgen::JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: CursorConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| CursorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trail_length == 0 {
            return Err(CursorError::InvalidConfig(
                "trailLength must be at least 1".into(),
            ));
        }
        if !(self.follow_factor > 0.0 && self.follow_factor <= 1.0) {
            return Err(CursorError::InvalidConfig(format!(
                "followFactor must be in (0, 1], got {}",
                self.follow_factor
            )));
        }
        let durations = [
            ("shockwaveDurationMs", self.shockwave_duration_ms),
            ("rippleDurationMs", self.ripple_duration_ms),
            ("shardLifetimeMs.min", self.shard_lifetime_ms.min),
        ];
        for (name, value) in durations {
            if !(value > 0.0) {
                return Err(CursorError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let ranges = [
            ("trailSpeed", &self.trail_speed),
            ("trailInitialSize", &self.trail_initial_size),
            ("trailSize", &self.trail_size),
            ("shardVelocity", &self.shard_velocity),
            ("shardLifetimeMs", &self.shard_lifetime_ms),
            ("shardSize", &self.shard_size),
        ];
        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(CursorError::InvalidConfig(format!(
                    "{} has an inverted or non-finite range ({}..{})",
                    name, range.min, range.max
                )));
            }
        }
        if !(self.trail_decay > 0.0 && self.trail_decay.is_finite()) {
            return Err(CursorError::InvalidConfig(format!(
                "trailDecay must be positive, got {}",
                self.trail_decay
            )));
        }
        if !(self.trail_speed.min > 0.0) {
            return Err(CursorError::InvalidConfig(format!(
                "trailSpeed.min must be positive, got {}",
                self.trail_speed.min
            )));
        }
        let finite = [
            ("trailDrift", self.trail_drift),
            ("trailHue", self.trail_hue),
            ("shardTravel", self.shard_travel),
            ("shockwaveRadius", self.shockwave_radius),
            ("markerOffset", self.marker_offset),
            ("emitIntervalMs", self.emit_interval_ms),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(CursorError::InvalidConfig(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        let spread = self.trail_hue_spread;
        if !(spread >= 0.0 && (spread * 2.0).is_finite()) {
            return Err(CursorError::InvalidConfig(format!(
                "trailHueSpread must be a finite non-negative angle, got {}",
                spread
            )));
        }
        if self.burst_palette.is_empty() {
            return Err(CursorError::InvalidConfig(
                "burstPalette must contain at least one colour".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_config() {
        let config = CursorConfig::default();
        assert_eq!(config.trail_length, 20);
        assert_eq!(config.burst_count, 50);
        assert_eq!(config.burst_palette.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CursorConfig::from_json(r#"{"trailLength": 8, "rippleDurationMs": 400}"#)
            .unwrap();
        assert_eq!(config.trail_length, 8);
        assert_eq!(config.ripple_duration_ms, 400.0);
        assert_eq!(config.shockwave_duration_ms, 600.0);
        assert_eq!(config.glyph_asset_base, "/img");
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(CursorConfig::from_json(r#"{"trailLength": 0}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"followFactor": 1.5}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"shockwaveDurationMs": 0}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"shardSize": {"min": 5, "max": 1}}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"burstPalette": []}"#).is_err());
        assert!(CursorConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_unsampleable_ranges_rejected() {
        // Finite bounds whose width overflows
        let wide = r#"{"shardVelocity": {"min": -1e308, "max": 1e308}}"#;
        assert!(matches!(
            CursorConfig::from_json(wide),
            Err(CursorError::InvalidConfig(_))
        ));
        assert!(CursorConfig::from_json(r#"{"trailHueSpread": 1e308}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"trailHueSpread": -5}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"trailHueSpread": 0}"#).is_ok());
    }

    #[test]
    fn test_non_decaying_trail_rejected() {
        assert!(CursorConfig::from_json(r#"{"trailDecay": 0}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"trailDecay": -0.1}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"trailSpeed": {"min": 0, "max": 0}}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"trailSpeed": {"min": 0, "max": 1}}"#).is_err());
        assert!(CursorConfig::from_json(r#"{"trailSpeed": {"min": 0.1, "max": 0.1}}"#).is_ok());
    }

    #[test]
    fn test_non_finite_scalars_rejected() {
        let endless_drift = CursorConfig {
            trail_drift: f64::INFINITY,
            ..CursorConfig::default()
        };
        assert!(endless_drift.validate().is_err());
        let nan_travel = CursorConfig {
            shard_travel: f64::NAN,
            ..CursorConfig::default()
        };
        assert!(nan_travel.validate().is_err());
    }

    #[test]
    fn test_range_sample() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = Range::new(800.0, 1200.0);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!((800.0..1200.0).contains(&v));
        }
        assert_eq!(Range::new(3.0, 3.0).sample(&mut rng), 3.0);
    }
}
