//! Level entities
//!
//! Everything placed by the tile legend is an [`Entity`]: a kind tag, a hitbox
//! and optionally an attached [`Behavior`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::patrol::Behavior;

/// Stable entity identifier (unique within one loaded level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Closed set of entity kinds used for contact dispatch and queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Key,
    Ghost,
    Portal,
    Wall,
}

/// How an entity reacts to being overlapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never pushed; other bodies are pushed out of it
    #[default]
    Static,
    /// Pushed out of static bodies after moving
    Dynamic,
}

/// A live game object
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Center of the hitbox, world units
    pub pos: Vec2,
    pub size: Vec2,
    pub body: BodyKind,
    pub sprite: &'static str,
    pub behavior: Option<Box<dyn Behavior>>,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn is_static(&self) -> bool {
        self.body == BodyKind::Static
    }
}
