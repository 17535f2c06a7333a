//! Fulgur core engine: surface-agnostic lightning bolts, particle bursts and drifting nodes.

pub mod bolt;
pub mod config;
pub mod engine;
pub mod error;
pub mod node;
pub mod particle;
pub mod path;
pub mod render;

pub use bolt::{Bolt, BoltParams, Phase};
pub use config::EngineConfig;
pub use engine::{FrameStats, LightningEngine};
pub use error::{ConfigError, EngineError};
pub use node::Node;
pub use particle::Particle;
