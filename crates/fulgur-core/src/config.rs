//! Tunable constants of the lightning effect.
//!
//! Defaults reproduce the reference look; a TOML file may override any subset of
//! fields since every section falls back to its `Default`.

use std::path::Path;

use glam::Vec4;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deepest subdivision accepted for any path (`2^12 + 1` points).
pub const MAX_PATH_DEPTH: u32 = 12;

/// Most branches per bolt and most particles per burst.
pub const MAX_BURST_COUNT: u32 = 64;

/// Most nodes added on top of the width-proportional count.
pub const MAX_EXTRA_NODES: u32 = 256;

/// Continuous range sampled uniformly in `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `[-half, half)`
    pub const fn symmetric(half: f32) -> Self {
        Self::new(-half, half)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.gen::<f32>() * (self.max - self.min)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Integer range sampled uniformly in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSpan {
    pub min: u32,
    pub max: u32,
}

impl CountSpan {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }

    fn check_capped(&self, field: &'static str, cap: u32) -> Result<(), ConfigError> {
        self.check(field)?;
        if self.max > cap {
            return Err(invalid(field, format!("max {} exceeds {cap}", self.max)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltConfig {
    /// Frame on which the first bolt appears.
    pub first_spawn_frame: u64,
    /// Frames between one spawn and the next.
    pub spawn_interval: CountSpan,
    pub second_bolt_chance: f32,
    /// Probability of an origin on the top edge.
    pub top_weight: f32,
    /// Probability of an origin on the left edge; the right edge takes the rest.
    pub left_weight: f32,
    /// Horizontal offset of a top-origin bolt's destination.
    pub top_reach: Span,
    /// Destination depth of a top-origin bolt as a fraction of surface height.
    pub top_depth_fraction: f32,
    /// Horizontal reach of a side-origin bolt as a fraction of surface width.
    pub side_reach_fraction: f32,
    /// Vertical offset of a side-origin bolt's destination.
    pub side_spread: Span,
    pub primary_depth: u32,
    pub branch_depth: u32,
    pub roughness: Span,
    /// Displacement per unit of `roughness * remaining depth`.
    pub displacement_scale: f32,
    pub branch_roughness_factor: f32,
    pub branches: CountSpan,
    pub branch_spread: Span,
    pub branch_drop: Span,
    pub max_opacity: Span,
    pub fade_rate: Span,
    pub hold_frames: CountSpan,
    pub width: Span,
    /// Multiplier on `fade_rate` while the bolt is appearing.
    pub appear_rate_factor: f32,
    /// Lowest flicker opacity while holding, as a fraction of max opacity.
    pub flicker_floor: f32,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            first_spawn_frame: 30,
            spawn_interval: CountSpan::new(25, 84),
            second_bolt_chance: 0.3,
            top_weight: 0.4,
            left_weight: 0.3,
            top_reach: Span::symmetric(150.0),
            top_depth_fraction: 0.7,
            side_reach_fraction: 0.6,
            side_spread: Span::symmetric(125.0),
            primary_depth: 4,
            branch_depth: 3,
            roughness: Span::new(0.6, 1.2),
            displacement_scale: 18.0,
            branch_roughness_factor: 0.8,
            branches: CountSpan::new(1, 3),
            branch_spread: Span::symmetric(60.0),
            branch_drop: Span::new(0.0, 80.0),
            max_opacity: Span::new(0.4, 0.85),
            fade_rate: Span::new(0.06, 0.11),
            hold_frames: CountSpan::new(2, 7),
            width: Span::new(1.2, 3.0),
            appear_rate_factor: 2.0,
            flicker_floor: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: CountSpan,
    pub speed: Span,
    pub radius: Span,
    pub initial_opacity: f32,
    /// Opacity lost per tick.
    pub decay: f32,
    pub glow_blur: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: CountSpan::new(3, 7),
            speed: Span::new(0.5, 2.5),
            radius: Span::new(1.0, 3.0),
            initial_opacity: 0.8,
            decay: 0.025,
            glow_blur: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Surface width covered by each node; count is `floor(width / spacing) + extra`.
    pub spacing: f32,
    pub extra: u32,
    /// Per-axis drift velocity.
    pub drift: Span,
    pub pulse_step: f32,
    pub base_opacity: f32,
    pub pulse_amplitude: f32,
    pub radius: f32,
    pub glow_blur: f32,
    pub link_distance: f32,
    pub link_opacity: f32,
    pub link_width: f32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            spacing: 120.0,
            extra: 3,
            drift: Span::symmetric(0.15),
            pulse_step: 0.04,
            base_opacity: 0.08,
            pulse_amplitude: 0.05,
            radius: 3.0,
            glow_blur: 12.0,
            link_distance: 200.0,
            link_opacity: 0.06,
            link_width: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub primary: Vec4,
    pub core: Vec4,
    pub bolt_glow: f32,
    pub core_glow: f32,
    pub core_opacity_factor: f32,
    pub core_width_factor: f32,
    pub branch_opacity_factor: f32,
    pub branch_width_factor: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            // #00c853
            primary: Vec4::new(0.0, 200.0 / 255.0, 83.0 / 255.0, 1.0),
            core: Vec4::ONE,
            bolt_glow: 18.0,
            core_glow: 8.0,
            core_opacity_factor: 0.6,
            core_width_factor: 0.3,
            branch_opacity_factor: 0.6,
            branch_width_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bolt: BoltConfig,
    pub particle: ParticleConfig,
    pub node: NodeConfig,
    pub style: StyleConfig,
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Rejects values that would stall the animation or make sampling panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bolt = &self.bolt;
        bolt.spawn_interval.check("bolt.spawn_interval")?;
        if bolt.spawn_interval.min == 0 {
            return Err(invalid("bolt.spawn_interval", "must be at least one frame"));
        }
        fraction("bolt.second_bolt_chance", bolt.second_bolt_chance)?;
        fraction("bolt.top_weight", bolt.top_weight)?;
        fraction("bolt.left_weight", bolt.left_weight)?;
        if bolt.top_weight + bolt.left_weight > 1.0 {
            return Err(invalid(
                "bolt.left_weight",
                "top and left weights must not exceed 1 together",
            ));
        }
        bolt.top_reach.check("bolt.top_reach")?;
        bolt.side_spread.check("bolt.side_spread")?;
        fraction("bolt.top_depth_fraction", bolt.top_depth_fraction)?;
        fraction("bolt.side_reach_fraction", bolt.side_reach_fraction)?;
        if !(1..=MAX_PATH_DEPTH).contains(&bolt.primary_depth) {
            return Err(invalid(
                "bolt.primary_depth",
                format!("must be within 1..={MAX_PATH_DEPTH}"),
            ));
        }
        if bolt.branch_depth > MAX_PATH_DEPTH {
            return Err(invalid(
                "bolt.branch_depth",
                format!("must not exceed {MAX_PATH_DEPTH}"),
            ));
        }
        bolt.roughness.check("bolt.roughness")?;
        non_negative("bolt.displacement_scale", bolt.displacement_scale)?;
        non_negative("bolt.branch_roughness_factor", bolt.branch_roughness_factor)?;
        bolt.branches.check_capped("bolt.branches", MAX_BURST_COUNT)?;
        bolt.branch_spread.check("bolt.branch_spread")?;
        bolt.branch_drop.check("bolt.branch_drop")?;
        bolt.max_opacity.check("bolt.max_opacity")?;
        if bolt.max_opacity.min <= 0.0 || bolt.max_opacity.max > 1.0 {
            return Err(invalid("bolt.max_opacity", "must lie within (0, 1]"));
        }
        bolt.fade_rate.check("bolt.fade_rate")?;
        if bolt.fade_rate.min <= 0.0 {
            return Err(invalid("bolt.fade_rate", "must be positive"));
        }
        bolt.hold_frames.check("bolt.hold_frames")?;
        bolt.width.check("bolt.width")?;
        positive("bolt.appear_rate_factor", bolt.appear_rate_factor)?;
        fraction("bolt.flicker_floor", bolt.flicker_floor)?;

        let particle = &self.particle;
        particle.count.check_capped("particle.count", MAX_BURST_COUNT)?;
        particle.speed.check("particle.speed")?;
        particle.radius.check("particle.radius")?;
        fraction("particle.initial_opacity", particle.initial_opacity)?;
        positive("particle.decay", particle.decay)?;
        non_negative("particle.glow_blur", particle.glow_blur)?;

        let node = &self.node;
        positive("node.spacing", node.spacing)?;
        if node.extra > MAX_EXTRA_NODES {
            return Err(invalid(
                "node.extra",
                format!("{} exceeds {MAX_EXTRA_NODES}", node.extra),
            ));
        }
        node.drift.check("node.drift")?;
        non_negative("node.pulse_step", node.pulse_step)?;
        non_negative("node.base_opacity", node.base_opacity)?;
        non_negative("node.pulse_amplitude", node.pulse_amplitude)?;
        non_negative("node.radius", node.radius)?;
        non_negative("node.glow_blur", node.glow_blur)?;
        positive("node.link_distance", node.link_distance)?;
        fraction("node.link_opacity", node.link_opacity)?;
        non_negative("node.link_width", node.link_width)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside [0, 1]")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a non-negative number")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a positive number")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [bolt]
            second_bolt_chance = 0.5
            roughness = { min = 0.2, max = 0.4 }

            [node]
            link_distance = 150.0
            "#,
        )
        .unwrap();

        assert_eq!(config.bolt.second_bolt_chance, 0.5);
        assert_eq!(config.bolt.roughness, Span::new(0.2, 0.4));
        assert_eq!(config.bolt.primary_depth, 4);
        assert_eq!(config.node.link_distance, 150.0);
        assert_eq!(config.particle, ParticleConfig::default());
    }

    #[test]
    fn inverted_span_is_rejected() {
        let err = EngineConfig::from_toml_str("[particle]\nradius = { min = 3.0, max = 1.0 }")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "particle.radius",
                ..
            }
        ));
    }

    #[test]
    fn zero_primary_depth_is_rejected() {
        let mut config = EngineConfig::default();
        config.bolt.primary_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn origin_weights_must_fit_in_one() {
        let mut config = EngineConfig::default();
        config.bolt.top_weight = 0.8;
        config.bolt.left_weight = 0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn counts_are_capped() {
        let mut config = EngineConfig::default();
        config.node.extra = 4_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "node.extra", .. })
        ));

        let mut config = EngineConfig::default();
        config.bolt.branches = CountSpan::new(1, MAX_BURST_COUNT + 1);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.particle.count = CountSpan::new(3, u32::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn pulse_settings_must_be_finite_and_non_negative() {
        let mut config = EngineConfig::default();
        config.node.pulse_step = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.node.base_opacity = -0.1;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.node.pulse_amplitude = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("fulgur-no-such-config.toml");
        let err = EngineConfig::load(&path).unwrap_err();
        match err {
            ConfigError::Io { path: reported, source } => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[bolt\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn spans_sample_inside_bounds() {
        let mut rng = rand::thread_rng();
        let span = Span::new(0.4, 0.85);
        let count = CountSpan::new(3, 7);
        for _ in 0..1000 {
            let value = span.sample(&mut rng);
            assert!((0.4..0.85).contains(&value) || value == 0.85);
            assert!((3..=7).contains(&count.sample(&mut rng)));
        }
    }
}
