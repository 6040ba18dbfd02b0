//! Collision detection and response for axis-aligned hitboxes
//!
//! Contacts are reported once when two boxes start overlapping ("begin"
//! semantics); a pair has to separate before it can collide again.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};

/// Penetration below this is treated as resting contact, not overlap
pub const CONTACT_EPSILON: f32 = 1e-3;

/// Axis-aligned bounding box, stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap: boxes sharing only an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (other.center - self.center).abs();
        let reach = self.half + other.half;
        reach.x - d.x > CONTACT_EPSILON && reach.y - d.y > CONTACT_EPSILON
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

/// Which side of an entity another entity touched (screen coordinates, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// Unit normal pointing away from the touched side, into the entity
    pub fn normal(self) -> Vec2 {
        match self {
            Side::Left => Vec2::X,
            Side::Right => Vec2::NEG_X,
            Side::Top => Vec2::Y,
            Side::Bottom => Vec2::NEG_Y,
        }
    }
}

/// A contact as seen by one participant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub other: EntityId,
    pub other_kind: EntityKind,
    pub side: Side,
}

/// Result of a box-vs-box overlap test, from the first box's point of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Side of the first box that was hit
    pub side: Side,
    /// Minimum translation that moves the first box out of the second
    pub correction: Vec2,
}

/// Check overlap of `a` against `b`, resolving along the axis of least penetration
pub fn overlap(a: &Aabb, b: &Aabb) -> Option<Overlap> {
    let d = b.center - a.center;
    let reach = a.half + b.half;
    let pen_x = reach.x - d.x.abs();
    let pen_y = reach.y - d.y.abs();
    if pen_x <= CONTACT_EPSILON || pen_y <= CONTACT_EPSILON {
        return None;
    }

    if pen_x < pen_y {
        let side = if d.x < 0.0 { Side::Left } else { Side::Right };
        Some(Overlap {
            side,
            correction: side.normal() * pen_x,
        })
    } else {
        let side = if d.y < 0.0 { Side::Top } else { Side::Bottom };
        Some(Overlap {
            side,
            correction: side.normal() * pen_y,
        })
    }
}

/// Two entities overlapping this tick; `side` is the side of `a` that was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub a: EntityId,
    pub b: EntityId,
    pub side: Side,
}

fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Tracks which pairs are touching so only newly begun contacts are reported
#[derive(Debug, Default)]
pub struct ContactTracker {
    touching: HashSet<(EntityId, EntityId)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the touching set with this tick's overlaps.
    ///
    /// Returns the touches whose pair was not touching last tick, in input
    /// order. A pair listed twice (seen from both sides) is reported once.
    pub fn update(&mut self, touches: &[Touch]) -> Vec<Touch> {
        let mut now = HashSet::new();
        let mut begun = Vec::new();
        for touch in touches {
            let key = pair_key(touch.a, touch.b);
            if now.insert(key) && !self.touching.contains(&key) {
                begun.push(*touch);
            }
        }
        self.touching = now;
        begun
    }

    /// Drop every pair involving a destroyed entity
    pub fn forget(&mut self, id: EntityId) {
        self.touching.retain(|&(a, b)| a != id && b != id);
    }

    #[cfg(test)]
    fn is_touching(&self, a: EntityId, b: EntityId) -> bool {
        self.touching.contains(&pair_key(a, b))
    }
}
