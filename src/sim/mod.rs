//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod particles;
pub mod patrol;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use collision::{Aabb, Contact, ContactTracker, Side, Touch, overlap};
pub use entity::{BodyKind, Entity, EntityId, EntityKind};
pub use particles::{ConfettiConfig, Particle, ParticleSystem, Sampled, Shape};
pub use patrol::{Behavior, BehaviorSpec, Patrol};
pub use state::{
    DialogSequence, GameEvent, GameProgress, GameState, HintDialog, LevelScene, PlayerPose,
    PostEffect, Scene, SceneKind, Tuning, WinScene,
};
pub use tick::{Direction, InputEvent, Key, TickInput, handle_input, tick};
pub use tilemap::{Archetype, Legend, Level, MalformedLevel, load};
