//! Game state and scene machine
//!
//! Exactly one [`Scene`] is active at a time. Transitions go through the
//! `enter_*` methods, which tear the previous scene down completely and emit
//! [`GameEvent`]s for the audio and presentation layers to drain.

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, ContactTracker};
use super::particles::{ConfettiConfig, DEFAULT_COUNT, ParticleSystem};
use super::tilemap::{self, Legend, Level, MalformedLevel};
use crate::consts::{LEVEL_ORIGIN, PLAYER_SPEED, TILE_SIZE};
use crate::content::{self, LevelMap};
use crate::settings::Settings;

/// Offset of the menu's start button from the viewport center
pub const START_BUTTON_OFFSET: Vec2 = Vec2::new(0.0, 100.0);
pub const START_BUTTON_SIZE: Vec2 = Vec2::new(180.0, 130.0);

/// Identifies a scene without its contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    Menu,
    Dialog,
    Level(usize),
    Win,
}

/// Progress through the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameProgress {
    /// Index of the level being played (0-based)
    pub level_index: usize,
    /// Keys collected in the current level attempt
    pub collected_keys: u32,
}

/// Whether the darkness/light overlay should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostEffect {
    enabled: bool,
}

impl PostEffect {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Position in the intro script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogSequence {
    index: usize,
}

impl DialogSequence {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current (speaker, line), if any lines remain
    pub fn current(&self, script: &[(&'static str, &'static str)]) -> Option<(&'static str, &'static str)> {
        script.get(self.index).copied()
    }

    pub(crate) fn advance(&mut self) {
        self.index += 1;
    }
}

/// Single-line hint shown over a level until the player moves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintDialog {
    text: Option<String>,
}

impl HintDialog {
    pub fn say(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }

    pub fn dismiss(&mut self) {
        self.text = None;
    }

    pub fn active(&self) -> bool {
        self.text.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Player animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerPose {
    #[default]
    Idle,
    Run,
}

impl PlayerPose {
    pub fn anim(self) -> &'static str {
        match self {
            PlayerPose::Idle => content::sprites::ANIM_IDLE,
            PlayerPose::Run => content::sprites::ANIM_RUN,
        }
    }
}

/// A level being played
#[derive(Debug)]
pub struct LevelScene {
    pub index: usize,
    pub world: Level,
    pub hint: HintDialog,
    pub contacts: ContactTracker,
    pub pose: PlayerPose,
    /// Player sprite faces left
    pub flip_x: bool,
}

impl LevelScene {
    fn new(index: usize, world: Level) -> Self {
        Self {
            index,
            world,
            hint: HintDialog::default(),
            contacts: ContactTracker::new(),
            pose: PlayerPose::Idle,
            flip_x: false,
        }
    }
}

/// Win screen: one fact and a confetti burst
#[derive(Debug)]
pub struct WinScene {
    pub fact: &'static str,
    pub confetti: ParticleSystem,
}

#[derive(Debug)]
pub enum Scene {
    Menu,
    Dialog(DialogSequence),
    Level(LevelScene),
    Win(WinScene),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Menu => SceneKind::Menu,
            Scene::Dialog(_) => SceneKind::Dialog,
            Scene::Level(level) => SceneKind::Level(level.index),
            Scene::Win(_) => SceneKind::Win,
        }
    }
}

/// Game events for audio/visual feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Background music should start looping
    MusicStarted,
    SceneEntered(SceneKind),
    DialogAdvanced { index: usize },
    KeyCollected { total: u32 },
    GhostHit,
    /// Portal touched without any keys
    PortalLocked,
    PortalEntered { next_level: usize },
    Won,
    /// The post effect was switched off and its overlay must be removed
    OverlayCleared,
    ToggleFullscreen,
}

/// Values copied out of [`Settings`] at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub player_speed: f32,
    pub viewport: Vec2,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for Tuning {
    fn from(settings: &Settings) -> Self {
        Self {
            player_speed: settings.player_speed,
            viewport: Vec2::from(settings.viewport),
            max_particles: settings.max_particles(),
        }
    }
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) progress: GameProgress,
    pub(crate) post_effect: PostEffect,
    pub(crate) scene: Scene,
    /// Simulated seconds since construction
    pub time: f32,
    pub tuning: Tuning,
    levels: Vec<LevelMap>,
    legend: Legend,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// New game on the built-in content with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(&Settings::default(), seed)
    }

    pub fn with_settings(settings: &Settings, seed: u64) -> Self {
        Self::with_levels(
            settings,
            seed,
            content::LEVELS.to_vec(),
            content::standard_legend(settings.patrol_speed),
        )
    }

    /// New game on custom levels. Starts in the menu with music requested.
    pub fn with_levels(settings: &Settings, seed: u64, levels: Vec<LevelMap>, legend: Legend) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            progress: GameProgress::default(),
            post_effect: PostEffect::default(),
            scene: Scene::Menu,
            time: 0.0,
            tuning: Tuning::from(settings),
            levels,
            legend,
            events: Vec::new(),
        };
        let speed = state.tuning.player_speed;
        if !speed.is_finite() || speed <= 0.0 {
            log::warn!("Invalid player speed {}, using {}", speed, PLAYER_SPEED);
            state.tuning.player_speed = PLAYER_SPEED;
        }
        state.events.push(GameEvent::MusicStarted);
        state.events.push(GameEvent::SceneEntered(SceneKind::Menu));
        state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn progress(&self) -> GameProgress {
        self.progress
    }

    pub fn post_effect(&self) -> PostEffect {
        self.post_effect
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn viewport_center(&self) -> Vec2 {
        self.tuning.viewport * 0.5
    }

    /// Clickable area of the menu's start button
    pub fn start_button(&self) -> Aabb {
        Aabb::new(self.viewport_center() + START_BUTTON_OFFSET, START_BUTTON_SIZE)
    }

    pub(crate) fn enter_menu(&mut self) {
        self.scene = Scene::Menu;
        self.events.push(GameEvent::SceneEntered(SceneKind::Menu));
        log::info!("Entered menu");
    }

    /// Start a fresh run at the intro dialog
    pub(crate) fn enter_dialog(&mut self) {
        self.progress = GameProgress::default();
        self.scene = Scene::Dialog(DialogSequence::default());
        self.events.push(GameEvent::SceneEntered(SceneKind::Dialog));
        log::info!("Entered intro dialog");
    }

    /// Load level `index` from scratch. Collected keys reset to zero.
    ///
    /// On error the current scene is left untouched.
    pub(crate) fn enter_level(&mut self, index: usize) -> Result<(), MalformedLevel> {
        let rows = self
            .levels
            .get(index)
            .copied()
            .ok_or(MalformedLevel::Missing { index })?;
        let world = tilemap::load(rows, &self.legend, Vec2::splat(TILE_SIZE), LEVEL_ORIGIN)
            .inspect_err(|e| log::error!("Failed to load level {}: {}", index, e))?;

        let (columns, height) = world.grid_size();
        self.progress.level_index = index;
        self.progress.collected_keys = 0;
        self.scene = Scene::Level(LevelScene::new(index, world));
        self.events.push(GameEvent::SceneEntered(SceneKind::Level(index)));
        log::info!("Entered level {} ({}x{} cells)", index, columns, height);
        Ok(())
    }

    pub(crate) fn enter_win(&mut self) {
        let config = ConfettiConfig {
            count: DEFAULT_COUNT.min(self.tuning.max_particles),
            ..ConfettiConfig::default()
        };
        let mut confetti = ParticleSystem::new();
        confetti.spawn(self.viewport_center(), &config, &mut self.rng);

        let fact = content::FACTS.choose(&mut self.rng).copied().unwrap_or_default();

        self.post_effect.set(false);
        self.scene = Scene::Win(WinScene { fact, confetti });
        self.events.push(GameEvent::OverlayCleared);
        self.events.push(GameEvent::Won);
        self.events.push(GameEvent::SceneEntered(SceneKind::Win));
        log::info!("Run complete after {} levels", self.levels.len());
    }
}
