//! Presentation seam
//!
//! The core never draws anything itself. Each frame it produces a list of
//! [`DrawDescriptor`]s plus optional overlay parameters, and a backend
//! implementing [`Renderer`] and [`OverlaySink`] puts them on screen.

pub mod draw;
pub mod overlay;

use glam::Vec2;
use serde::Serialize;

pub use draw::draw_list;
pub use overlay::{OverlayParams, apply_overlay, light_params};

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// What to draw at a descriptor's position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Visual {
    Sprite {
        name: &'static str,
        /// Animation to play, if the sprite has any
        anim: Option<&'static str>,
    },
    Rect {
        size: Vec2,
    },
    Circle {
        radius: f32,
    },
    Text {
        text: String,
        size: f32,
    },
}

/// One drawable, centered on `pos`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawDescriptor {
    pub pos: Vec2,
    pub visual: Visual,
    pub color: [f32; 4],
    pub opacity: f32,
    /// Degrees
    pub rotation: f32,
    pub scale: Vec2,
    pub flip_x: bool,
    /// Higher draws on top
    pub z: i32,
    /// Screen space rather than world space
    pub fixed: bool,
}

impl DrawDescriptor {
    pub fn new(pos: Vec2, visual: Visual) -> Self {
        Self {
            pos,
            visual,
            color: WHITE,
            opacity: 1.0,
            rotation: 0.0,
            scale: Vec2::ONE,
            flip_x: false,
            z: 0,
            fixed: false,
        }
    }

    pub fn sprite(pos: Vec2, name: &'static str) -> Self {
        Self::new(pos, Visual::Sprite { name, anim: None })
    }

    pub fn text(pos: Vec2, text: impl Into<String>, size: f32) -> Self {
        Self::new(
            pos,
            Visual::Text {
                text: text.into(),
                size,
            },
        )
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }
}

/// Resolves asset ids to backend handles
pub trait AssetRegistry {
    fn resolve_sprite(&self, name: &str) -> bool;
    fn resolve_sound(&self, name: &str) -> bool;
}

pub trait Renderer {
    fn submit(&mut self, frame: &[DrawDescriptor]);
}

/// Applies or removes a named full-screen post effect
pub trait OverlaySink {
    fn apply_overlay(&mut self, name: &str, params: Option<&OverlayParams>);
}

/// Asset ids referenced by the game that the registry cannot resolve
pub fn missing_assets(registry: &dyn AssetRegistry) -> Vec<&'static str> {
    let sprites = crate::content::sprites::ALL
        .iter()
        .filter(|name| !registry.resolve_sprite(name));
    let sounds = crate::content::sounds::ALL
        .iter()
        .filter(|name| !registry.resolve_sound(name));
    sprites.chain(sounds).copied().collect()
}

/// Backend that logs frame summaries, for headless runs
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn submit(&mut self, frame: &[DrawDescriptor]) {
        self.frames += 1;
        log::trace!("frame {}: {} draws", self.frames, frame.len());
    }
}

impl OverlaySink for LogRenderer {
    fn apply_overlay(&mut self, name: &str, params: Option<&OverlayParams>) {
        match params {
            Some(p) => log::trace!("overlay {} at {:?}", name, p.center),
            None => log::trace!("overlay {} cleared", name),
        }
    }
}

impl AssetRegistry for LogRenderer {
    fn resolve_sprite(&self, _name: &str) -> bool {
        true
    }

    fn resolve_sound(&self, _name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoSounds;

    impl AssetRegistry for NoSounds {
        fn resolve_sprite(&self, _name: &str) -> bool {
            true
        }

        fn resolve_sound(&self, name: &str) -> bool {
            name == "score"
        }
    }

    #[test]
    fn test_missing_assets_lists_unresolved() {
        let missing = missing_assets(&NoSounds);
        assert!(missing.contains(&"won"));
        assert!(missing.contains(&"backgroundaudio"));
        assert!(!missing.contains(&"score"));
        assert!(!missing.contains(&"player"));
    }
}
