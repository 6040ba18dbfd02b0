//! Hidden Realms - a tile-based key-and-portal adventure
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile maps, patrols, collisions, confetti, scenes)
//! - `content`: Built-in levels, tile legend, intro script and trivia
//! - `renderer`: Draw descriptors and overlay parameters for the presentation layer
//! - `audio`: Sound requests derived from game events
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod content;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Side length of one map cell in world units
    pub const TILE_SIZE: f32 = 64.0;
    /// World position of the top-left map cell
    pub const LEVEL_ORIGIN: Vec2 = Vec2::new(64.0, 64.0);

    /// Player movement speed (world units/s)
    pub const PLAYER_SPEED: f32 = 520.0;
    /// Default ghost patrol speed (world units/s)
    pub const PATROL_SPEED: f32 = 100.0;

    /// Hitbox sizes
    pub const PLAYER_SIZE: f32 = 48.0;
    pub const KEY_SIZE: f32 = 40.0;
    pub const GHOST_SIZE: f32 = 56.0;

    /// Confetti particles live at most this long (seconds)
    pub const CONFETTI_LIFESPAN: f32 = 4.0;
}

/// Map `t` onto a sinusoid oscillating between `lo` and `hi`, starting at `lo`.
#[inline]
pub fn wave(lo: f32, hi: f32, t: f32) -> f32 {
    lo + (hi - lo) * (1.0 - t.cos()) * 0.5
}

/// Convert HSL (all components 0-1) to linear RGB (0-1)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_bounds() {
        assert!((wave(-1.0, 1.0, 0.0) + 1.0).abs() < 1e-6);
        assert!((wave(-1.0, 1.0, std::f32::consts::PI) - 1.0).abs() < 1e-6);
        for i in 0..100 {
            let v = wave(-1.0, 1.0, i as f32 * 0.37);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);

        let grey = hsl_to_rgb(0.3, 0.0, 0.4);
        assert_eq!(grey, [0.4, 0.4, 0.4]);
    }
}
