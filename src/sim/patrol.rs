//! Attached entity behaviors
//!
//! A [`Behavior`] reacts to its owner's contacts and moves its owner each tick.
//! Ghosts carry a [`Patrol`]: constant horizontal speed, reversed whenever
//! something hits them from the left or right.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Contact;
use crate::consts::PATROL_SPEED;

/// Per-entity behavior attached at level load
pub trait Behavior: fmt::Debug {
    /// Called once for every contact that begins on the owning entity
    fn on_collide(&mut self, contact: &Contact);

    /// Advance the owning entity by one tick
    fn on_tick(&mut self, pos: &mut Vec2, dt: f32);
}

/// Declarative behavior description carried by tile archetypes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorSpec {
    Patrol { speed: f32, direction: f32 },
}

impl BehaviorSpec {
    pub fn build(&self) -> Box<dyn Behavior> {
        match *self {
            BehaviorSpec::Patrol { speed, direction } => Box::new(Patrol::new(speed, direction)),
        }
    }
}

/// Ground patrol: walks left/right, never falls or jumps
#[derive(Debug, Clone, PartialEq)]
pub struct Patrol {
    speed: f32,
    /// Always +1.0 or -1.0
    direction: f32,
}

impl Default for Patrol {
    fn default() -> Self {
        Self::new(PATROL_SPEED, 1.0)
    }
}

impl Patrol {
    /// `direction` is reduced to its sign (zero counts as positive)
    pub fn new(speed: f32, direction: f32) -> Self {
        Self {
            speed,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
        }
    }

    #[cfg(test)]
    fn direction(&self) -> f32 {
        self.direction
    }
}

impl Behavior for Patrol {
    fn on_collide(&mut self, contact: &Contact) {
        if contact.side.is_horizontal() {
            self.direction = -self.direction;
        }
    }

    fn on_tick(&mut self, pos: &mut Vec2, dt: f32) {
        pos.x += self.speed * self.direction * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Side;
    use crate::sim::entity::{EntityId, EntityKind};
    use proptest::prelude::*;

    fn contact(side: Side) -> Contact {
        Contact {
            other: EntityId(7),
            other_kind: EntityKind::Wall,
            side,
        }
    }

    #[test]
    fn test_patrol_moves_horizontally_only() {
        let mut patrol = Patrol::new(100.0, 1.0);
        let mut pos = Vec2::new(10.0, 20.0);
        patrol.on_tick(&mut pos, 0.5);
        assert_eq!(pos, Vec2::new(60.0, 20.0));

        patrol.on_collide(&contact(Side::Right));
        patrol.on_tick(&mut pos, 0.5);
        assert_eq!(pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_vertical_contacts_ignored() {
        let mut patrol = Patrol::default();
        patrol.on_collide(&contact(Side::Top));
        patrol.on_collide(&contact(Side::Bottom));
        assert_eq!(patrol.direction(), 1.0);
    }

    #[test]
    fn test_spec_builds_patrol() {
        let mut behavior = BehaviorSpec::Patrol {
            speed: 50.0,
            direction: -3.0,
        }
        .build();
        let mut pos = Vec2::ZERO;
        behavior.on_tick(&mut pos, 1.0);
        assert_eq!(pos, Vec2::new(-50.0, 0.0));
    }

    fn any_side() -> impl Strategy<Value = Side> {
        prop_oneof![
            Just(Side::Left),
            Just(Side::Right),
            Just(Side::Top),
            Just(Side::Bottom),
        ]
    }

    proptest! {
        #[test]
        fn direction_flips_once_per_lateral_contact(
            initial in prop_oneof![Just(1.0f32), Just(-1.0f32)],
            sides in proptest::collection::vec(any_side(), 0..64),
        ) {
            let mut patrol = Patrol::new(PATROL_SPEED, initial);
            for side in &sides {
                patrol.on_collide(&contact(*side));
            }
            let lateral = sides.iter().filter(|s| s.is_horizontal()).count() as i32;
            prop_assert_eq!(patrol.direction(), initial * (-1.0f32).powi(lateral));
        }
    }
}
