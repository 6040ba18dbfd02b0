//! Fixed timestep simulation tick
//!
//! [`handle_input`] applies discrete input events between ticks; [`tick`]
//! advances the active scene by one timestep.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Contact, Side, Touch, overlap};
use super::entity::{EntityId, EntityKind};
use super::state::{GameEvent, GameProgress, GameState, LevelScene, PlayerPose, Scene};
use super::tilemap::{Level, MalformedLevel};
use crate::content;

/// Movement directions in screen space (+y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    F,
    Other(char),
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Discrete input edges, delivered between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyPress(Key),
    KeyRelease(Key),
    /// Pointer press at a screen position
    PointerPress(Vec2),
}

/// Continuous input for one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directions currently held down
    pub held: Vec<Direction>,
}

impl TickInput {
    pub fn holding(directions: &[Direction]) -> Self {
        Self {
            held: directions.to_vec(),
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held.contains(&direction)
    }
}

/// What a contact between two kinds does, from the first kind's side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactRule {
    Ignore,
    CollectKey,
    GhostHit,
    EnterPortal,
}

fn contact_rule(me: EntityKind, other: EntityKind) -> ContactRule {
    match (me, other) {
        (EntityKind::Player, EntityKind::Key) => ContactRule::CollectKey,
        (EntityKind::Player, EntityKind::Ghost) => ContactRule::GhostHit,
        (EntityKind::Player, EntityKind::Portal) => ContactRule::EnterPortal,
        _ => ContactRule::Ignore,
    }
}

/// Scene change requested while the current scene is borrowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Restart(usize),
    Advance(usize),
    Win,
}

/// Apply one input event to the active scene
pub fn handle_input(state: &mut GameState, event: InputEvent) -> Result<(), MalformedLevel> {
    match &mut state.scene {
        Scene::Menu => {
            let start = match event {
                InputEvent::KeyPress(Key::Enter | Key::Space) => true,
                InputEvent::PointerPress(pos) => state.start_button().contains_point(pos),
                _ => false,
            };
            if start {
                state.enter_dialog();
            }
        }
        Scene::Dialog(dialog) => {
            if !matches!(event, InputEvent::KeyPress(_) | InputEvent::PointerPress(_)) {
                return Ok(());
            }
            if dialog.index() + 1 < content::INTRO_SCRIPT.len() {
                dialog.advance();
                let index = dialog.index();
                state.events.push(GameEvent::DialogAdvanced { index });
            } else {
                state.enter_level(0)?;
                state.post_effect.set(true);
            }
        }
        Scene::Level(level) => match event {
            InputEvent::KeyPress(Key::F) => state.events.push(GameEvent::ToggleFullscreen),
            InputEvent::KeyPress(key) if key.direction().is_some() => level.hint.dismiss(),
            InputEvent::KeyRelease(key) if key.direction().is_some() => {
                level.pose = PlayerPose::Idle;
            }
            _ => {}
        },
        Scene::Win(_) => {
            if matches!(event, InputEvent::KeyPress(_) | InputEvent::PointerPress(_)) {
                state.enter_menu();
            }
        }
    }
    Ok(())
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), MalformedLevel> {
    state.time += dt;

    let speed = state.tuning.player_speed;
    let level_count = state.level_count();
    let transition = match &mut state.scene {
        Scene::Level(level) => tick_level(
            level,
            &mut state.progress,
            &mut state.events,
            input,
            speed * dt,
            level_count,
            dt,
        ),
        Scene::Win(win) => {
            win.confetti.tick(dt);
            None
        }
        Scene::Menu | Scene::Dialog(_) => None,
    };

    match transition {
        Some(Transition::Restart(index)) => state.enter_level(index)?,
        Some(Transition::Advance(next_level)) => {
            state.enter_level(next_level)?;
            state.events.push(GameEvent::PortalEntered { next_level });
        }
        Some(Transition::Win) => state.enter_win(),
        None => {}
    }
    Ok(())
}

fn tick_level(
    level: &mut LevelScene,
    progress: &mut GameProgress,
    events: &mut Vec<GameEvent>,
    input: &TickInput,
    step: f32,
    level_count: usize,
    dt: f32,
) -> Option<Transition> {
    let LevelScene {
        index,
        world,
        hint,
        contacts,
        pose,
        flip_x,
    } = level;
    let player_id = world.player_id()?;

    // Player input
    let mut heading = Vec2::ZERO;
    for direction in Direction::ALL {
        if !input.is_held(direction) {
            continue;
        }
        heading += direction.unit();
        match direction {
            Direction::Left => *flip_x = true,
            Direction::Right => *flip_x = false,
            _ => {}
        }
    }
    if !input.held.is_empty() {
        *pose = PlayerPose::Run;
    }

    // Held directions add up, so diagonals are faster and opposites cancel
    let mut touches = move_player(world, player_id, heading * step);

    // Behaviors
    for entity in world.entities_mut() {
        if let Some(behavior) = entity.behavior.as_mut() {
            behavior.on_tick(&mut entity.pos, dt);
        }
    }
    touches.extend(behavior_touches(world));

    // Contacts
    for touch in contacts.update(&touches) {
        let (Some(a_kind), Some(b_kind)) = (
            world.get(touch.a).map(|e| e.kind),
            world.get(touch.b).map(|e| e.kind),
        ) else {
            // Destroyed earlier this tick
            continue;
        };
        let sides = [
            (touch.a, a_kind, touch.b, b_kind, touch.side),
            (touch.b, b_kind, touch.a, a_kind, touch.side.opposite()),
        ];
        for (me, my_kind, other, other_kind, side) in sides {
            if let Some(behavior) = world.get_mut(me).and_then(|e| e.behavior.as_mut()) {
                behavior.on_collide(&Contact {
                    other,
                    other_kind,
                    side,
                });
            }

            match contact_rule(my_kind, other_kind) {
                ContactRule::Ignore => {}
                ContactRule::CollectKey => {
                    if world.remove(other).is_some() {
                        contacts.forget(other);
                        progress.collected_keys += 1;
                        events.push(GameEvent::KeyCollected {
                            total: progress.collected_keys,
                        });
                        log::debug!("Key {:?} collected ({} total)", other, progress.collected_keys);
                    }
                }
                ContactRule::GhostHit => {
                    log::info!("Ghost hit, restarting level {}", index);
                    events.push(GameEvent::GhostHit);
                    return Some(Transition::Restart(*index));
                }
                ContactRule::EnterPortal => {
                    if progress.collected_keys == 0 {
                        hint.say(content::PORTAL_LOCKED_HINT);
                        events.push(GameEvent::PortalLocked);
                    } else if *index + 1 < level_count {
                        return Some(Transition::Advance(*index + 1));
                    } else {
                        return Some(Transition::Win);
                    }
                }
            }
        }
    }
    None
}

/// Move the player one axis at a time, stopping at static bodies.
///
/// Every body the player was stopped by is reported as a touch.
fn move_player(world: &mut Level, player_id: EntityId, delta: Vec2) -> Vec<Touch> {
    let mut touches = Vec::new();
    if delta == Vec2::ZERO {
        return touches;
    }
    let solids: Vec<(EntityId, Aabb)> = world
        .entities()
        .iter()
        .filter(|e| e.id != player_id && e.is_static())
        .map(|e| (e.id, e.aabb()))
        .collect();
    let Some(player) = world.get_mut(player_id) else {
        return touches;
    };

    for axis in [Vec2::X, Vec2::Y] {
        let along = delta.dot(axis);
        if along == 0.0 {
            continue;
        }
        player.pos += axis * along;
        for (id, solid) in &solids {
            let body = player.aabb();
            if !body.overlaps(solid) {
                continue;
            }
            let side = match (axis == Vec2::X, along > 0.0) {
                (true, true) => {
                    player.pos.x = solid.min().x - body.half.x;
                    Side::Right
                }
                (true, false) => {
                    player.pos.x = solid.max().x + body.half.x;
                    Side::Left
                }
                (false, true) => {
                    player.pos.y = solid.min().y - body.half.y;
                    Side::Bottom
                }
                (false, false) => {
                    player.pos.y = solid.max().y + body.half.y;
                    Side::Top
                }
            };
            touches.push(Touch {
                a: player_id,
                b: *id,
                side,
            });
        }
    }
    touches
}

/// Overlaps of every behavior-driven entity against everything else
fn behavior_touches(world: &Level) -> Vec<Touch> {
    let entities = world.entities();
    let mut touches = Vec::new();
    for (i, mover) in entities.iter().enumerate() {
        if mover.behavior.is_none() {
            continue;
        }
        let body = mover.aabb();
        for (j, other) in entities.iter().enumerate() {
            // Pairs of two movers are reported once
            if i == j || (other.behavior.is_some() && j < i) {
                continue;
            }
            if let Some(hit) = overlap(&body, &other.aabb()) {
                touches.push(Touch {
                    a: mover.id,
                    b: other.id,
                    side: hit.side,
                });
            }
        }
    }
    touches
}
