//! Hidden Realms headless entry point
//!
//! Runs the simulation with logging backends and a scripted input sequence.
//! A graphical frontend drives the same `Session` calls from its event loop.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use hidden_realms::Settings;
use hidden_realms::audio::{AudioManager, LogSink};
use hidden_realms::consts::{MAX_SUBSTEPS, SIM_DT};
use hidden_realms::renderer::{self, LogRenderer, Renderer};
use hidden_realms::settings::SETTINGS_ENV;
use hidden_realms::sim::{
    Direction, GameEvent, GameState, InputEvent, Key, MalformedLevel, SceneKind, TickInput,
    handle_input, tick,
};

/// Demo frame rate
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many seconds of demo time
const DEMO_SECONDS: f32 = 60.0;

/// Game instance holding all state
struct Session {
    state: GameState,
    audio: AudioManager,
    sound: LogSink,
    renderer: LogRenderer,
    accumulator: f32,
    input: TickInput,
}

impl Session {
    fn new(settings: &Settings, seed: u64) -> Self {
        let backend = LogRenderer::default();
        let missing = renderer::missing_assets(&backend);
        if !missing.is_empty() {
            log::warn!("Missing assets: {:?}", missing);
        }
        Self {
            state: GameState::with_settings(settings, seed),
            audio: AudioManager::new(settings),
            sound: LogSink,
            renderer: backend,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    fn handle(&mut self, event: InputEvent) -> Result<(), MalformedLevel> {
        handle_input(&mut self.state, event)
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) -> Result<(), MalformedLevel> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        Ok(())
    }

    /// Play sounds for new events and return them
    fn flush_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        self.audio.dispatch(&events, &mut self.sound);
        for event in &events {
            match event {
                GameEvent::SceneEntered(kind) => log::info!("Scene: {:?}", kind),
                GameEvent::ToggleFullscreen => log::info!("Fullscreen toggle requested"),
                _ => log::debug!("Event: {:?}", event),
            }
        }
        events
    }

    /// Render the current frame
    fn render(&mut self) {
        let frame = renderer::draw_list(&self.state);
        self.renderer.submit(&frame);
        renderer::apply_overlay(&self.state, self.state.tuning.viewport, &mut self.renderer);
    }
}

/// Held directions for the demo at time `t`: sweep the map in a zigzag
fn demo_directions(t: f32) -> Vec<Direction> {
    const PATTERN: [&[Direction]; 6] = [
        &[Direction::Right],
        &[Direction::Down],
        &[Direction::Left],
        &[Direction::Down],
        &[Direction::Right, Direction::Up],
        &[],
    ];
    PATTERN[(t / 1.5) as usize % PATTERN.len()].to_vec()
}

fn run(settings: &Settings, seed: u64) -> Result<(), MalformedLevel> {
    let mut session = Session::new(settings, seed);
    session.flush_events();

    session.handle(InputEvent::KeyPress(Key::Enter))?;
    for _ in 0..hidden_realms::content::INTRO_SCRIPT.len() {
        session.handle(InputEvent::KeyPress(Key::Space))?;
    }

    let mut t = 0.0;
    let mut keys = 0;
    while t < DEMO_SECONDS {
        session.input.held = demo_directions(t);
        session.update(FRAME_DT)?;
        for event in session.flush_events() {
            if let GameEvent::KeyCollected { .. } = event {
                keys += 1;
            }
        }
        session.render();
        if session.state.scene_kind() == SceneKind::Win {
            break;
        }
        t += FRAME_DT;
    }

    log::info!(
        "Demo finished after {:.1}s in {:?}: {} keys collected, {} frames",
        t,
        session.state.scene_kind(),
        keys,
        session.renderer.frames()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Hidden Realms (headless) starting...");

    let path = std::env::var_os(SETTINGS_ENV).map(PathBuf::from);
    let settings = Settings::load_or_default(path.as_deref());
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    log::info!("Seed: {}", seed);

    match run(&settings, seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Level error: {}", e);
            ExitCode::FAILURE
        }
    }
}
