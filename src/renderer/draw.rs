//! Per-scene draw lists

use glam::Vec2;

use super::{DrawDescriptor, Visual};
use crate::content::{self, sprites};
use crate::sim::particles::Shape;
use crate::sim::{EntityKind, GameState, LevelScene, Scene, WinScene};

const TITLE_SIZE: f32 = 64.0;
const BODY_SIZE: f32 = 32.0;
const HUD_POS: Vec2 = Vec2::new(24.0, 24.0);

const BUTTON_COLOR: [f32; 4] = [0.35, 0.2, 0.55, 1.0];
const DIALOG_BOX_COLOR: [f32; 4] = [0.05, 0.05, 0.1, 0.85];

/// Z order by entity kind: floor dressing first, player on top
fn layer(kind: EntityKind) -> i32 {
    match kind {
        EntityKind::Wall => 0,
        EntityKind::Portal | EntityKind::Key => 1,
        EntityKind::Ghost => 2,
        EntityKind::Player => 3,
    }
}

/// Everything to draw this frame, sorted back to front
pub fn draw_list(state: &GameState) -> Vec<DrawDescriptor> {
    let center = state.viewport_center();
    let mut frame = match state.scene() {
        Scene::Menu => menu(state),
        Scene::Dialog(dialog) => match dialog.current(content::INTRO_SCRIPT) {
            Some((speaker, line)) => dialog_box(state.tuning.viewport, speaker, line),
            None => Vec::new(),
        },
        Scene::Level(level) => level_draws(level, state.progress().collected_keys, center),
        Scene::Win(win) => win_draws(win, center),
    };
    frame.sort_by_key(|d| d.z);
    frame
}

fn menu(state: &GameState) -> Vec<DrawDescriptor> {
    let center = state.viewport_center();
    let button = state.start_button();
    vec![
        DrawDescriptor::text(center - Vec2::new(0.0, 100.0), content::MENU_TITLE, TITLE_SIZE),
        DrawDescriptor::new(
            button.center,
            Visual::Rect {
                size: button.half * 2.0,
            },
        )
        .with_color(BUTTON_COLOR),
        DrawDescriptor::text(button.center, content::START_LABEL, BODY_SIZE).with_z(1),
    ]
}

fn dialog_box(viewport: Vec2, speaker: &'static str, line: &str) -> Vec<DrawDescriptor> {
    let box_size = Vec2::new(viewport.x - 128.0, 200.0);
    let box_center = Vec2::new(viewport.x * 0.5, viewport.y - 64.0 - box_size.y * 0.5);
    vec![
        DrawDescriptor::new(box_center, Visual::Rect { size: box_size })
            .with_color(DIALOG_BOX_COLOR)
            .fixed(),
        DrawDescriptor::sprite(box_center - Vec2::new(box_size.x * 0.5 - 96.0, 0.0), speaker)
            .with_z(1)
            .fixed(),
        DrawDescriptor::text(box_center + Vec2::new(64.0, 0.0), line, BODY_SIZE)
            .with_z(1)
            .fixed(),
    ]
}

fn level_draws(level: &LevelScene, keys: u32, center: Vec2) -> Vec<DrawDescriptor> {
    let mut frame: Vec<DrawDescriptor> = level
        .world
        .entities()
        .iter()
        .map(|entity| {
            let mut draw = DrawDescriptor::sprite(entity.pos, entity.sprite).with_z(layer(entity.kind));
            if entity.kind == EntityKind::Player {
                draw.visual = Visual::Sprite {
                    name: sprites::PLAYER,
                    anim: Some(level.pose.anim()),
                };
                draw.flip_x = level.flip_x;
            }
            draw
        })
        .collect();

    // HUD
    frame.push(
        DrawDescriptor::text(HUD_POS, format!("Keys: {}", keys), BODY_SIZE)
            .with_z(10)
            .fixed(),
    );
    if let Some(text) = level.hint.text() {
        frame.push(
            DrawDescriptor::text(center, text, BODY_SIZE)
                .with_z(11)
                .fixed(),
        );
    }
    frame
}

fn win_draws(win: &WinScene, center: Vec2) -> Vec<DrawDescriptor> {
    let mut frame = vec![
        DrawDescriptor::text(center - Vec2::new(0.0, 200.0), content::WIN_TITLE, TITLE_SIZE),
        DrawDescriptor::text(center, win.fact, BODY_SIZE),
    ];
    frame.extend(win.confetti.particles().iter().map(|p| {
        let visual = match p.shape {
            Shape::Rect { width, height } => Visual::Rect {
                size: Vec2::new(width, height),
            },
            Shape::Circle { radius } => Visual::Circle { radius },
        };
        let [r, g, b] = p.color;
        DrawDescriptor {
            color: [r, g, b, 1.0],
            opacity: p.opacity,
            rotation: p.rotation,
            scale: Vec2::new(p.scale_x, 1.0),
            z: 5,
            ..DrawDescriptor::new(p.pos, visual)
        }
    }));
    frame
}
