//! Light overlay parameters
//!
//! While the post effect is on, the level is dark except for a soft light
//! following the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::OverlaySink;
use crate::content::LIGHT_EFFECT;
use crate::sim::{GameState, Scene};

pub const LIGHT_RADIUS: f32 = 6.0;
pub const LIGHT_BLUR: f32 = 64.0;
/// Light center relative to the player
pub const LIGHT_OFFSET: Vec2 = Vec2::new(60.0, 60.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayParams {
    pub radius: f32,
    pub blur: f32,
    pub resolution: Vec2,
    pub center: Vec2,
    pub mouse: Vec2,
}

/// Parameters for this frame, or `None` when no overlay should be shown
pub fn light_params(state: &GameState, viewport: Vec2) -> Option<OverlayParams> {
    if !state.post_effect().enabled() {
        return None;
    }
    let Scene::Level(level) = state.scene() else {
        return None;
    };
    let center = level.world.player()?.pos + LIGHT_OFFSET;
    Some(OverlayParams {
        radius: LIGHT_RADIUS,
        blur: LIGHT_BLUR,
        resolution: viewport,
        center,
        mouse: center,
    })
}

/// Push this frame's overlay state to the sink
pub fn apply_overlay(state: &GameState, viewport: Vec2, sink: &mut dyn OverlaySink) {
    let params = light_params(state, viewport);
    sink.apply_overlay(LIGHT_EFFECT, params.as_ref());
}
