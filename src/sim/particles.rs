//! Confetti burst simulation
//!
//! Every particle carries its own kinematics; nothing couples two particles.
//! Motion per tick:
//!
//! ```text
//! vel.y    += gravity * dt
//! pos      += vel * dt
//! rotation += angular_vel * dt
//! opacity  -= fade * dt
//! vel      *= air_drag          (per tick, not per second)
//! scale.x   = wave(-1, 1, clock * spin)
//! ```

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::CONFETTI_LIFESPAN;
use crate::{hsl_to_rgb, wave};

pub const DEFAULT_COUNT: usize = 180;
pub const DEFAULT_GRAVITY: f32 = 800.0;
pub const DEFAULT_AIR_DRAG: f32 = 0.9;
pub const DEFAULT_VELOCITY: (f32, f32) = (1000.0, 4000.0);
pub const DEFAULT_ANGULAR_VELOCITY: (f32, f32) = (-200.0, 200.0);
pub const DEFAULT_FADE: f32 = 0.3;
pub const DEFAULT_SPREAD: f32 = 60.0;
pub const DEFAULT_SPIN: (f32, f32) = (2.0, 8.0);
pub const DEFAULT_SATURATION: f32 = 0.7;
pub const DEFAULT_LIGHTNESS: f32 = 0.6;

/// A config value that is either fixed or drawn fresh for every particle
#[derive(Debug, Clone, Copy)]
pub enum Sampled<T> {
    Literal(T),
    Distribution(fn(&mut Pcg32) -> T),
}

impl<T: Copy> Sampled<T> {
    pub fn sample(&self, rng: &mut Pcg32) -> T {
        match self {
            Sampled::Literal(value) => *value,
            Sampled::Distribution(draw) => draw(rng),
        }
    }
}

impl<T> From<T> for Sampled<T> {
    fn from(value: T) -> Self {
        Sampled::Literal(value)
    }
}

fn random_color(rng: &mut Pcg32) -> [f32; 3] {
    hsl_to_rgb(rng.random_range(0.0..1.0), DEFAULT_SATURATION, DEFAULT_LIGHTNESS)
}

fn random_velocity(rng: &mut Pcg32) -> f32 {
    rng.random_range(DEFAULT_VELOCITY.0..DEFAULT_VELOCITY.1)
}

fn random_angular_velocity(rng: &mut Pcg32) -> f32 {
    rng.random_range(DEFAULT_ANGULAR_VELOCITY.0..DEFAULT_ANGULAR_VELOCITY.1)
}

/// Burst parameters. Angles are in degrees.
#[derive(Debug, Clone)]
pub struct ConfettiConfig {
    pub count: usize,
    pub color: Sampled<[f32; 3]>,
    pub gravity: f32,
    pub air_drag: f32,
    /// 0 points straight up
    pub heading: Sampled<f32>,
    /// Full width of the uniform jitter around `heading`
    pub spread: f32,
    pub velocity: Sampled<f32>,
    pub angular_velocity: Sampled<f32>,
    /// Opacity lost per second
    pub fade: f32,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            color: Sampled::Distribution(random_color),
            gravity: DEFAULT_GRAVITY,
            air_drag: DEFAULT_AIR_DRAG,
            heading: Sampled::Literal(0.0),
            spread: DEFAULT_SPREAD,
            velocity: Sampled::Distribution(random_velocity),
            angular_velocity: Sampled::Distribution(random_angular_velocity),
            fade: DEFAULT_FADE,
        }
    }
}

/// Confetti piece outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees per second
    pub angular_vel: f32,
    /// Degrees
    pub rotation: f32,
    pub opacity: f32,
    /// Horizontal scale, flutters in [-1, 1]
    pub scale_x: f32,
    /// Flutter frequency (radians per second of clock)
    pub spin: f32,
    /// Flutter phase clock (seconds)
    pub clock: f32,
    /// Seconds left before forced removal
    pub ttl: f32,
    pub shape: Shape,
    pub color: [f32; 3],
    gravity: f32,
    air_drag: f32,
    fade: f32,
}

impl Particle {
    /// Integrate one tick. Returns false once the particle should be removed.
    pub fn update(&mut self, dt: f32) -> bool {
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;
        self.rotation += self.angular_vel * dt;
        self.opacity = (self.opacity - self.fade * dt).max(0.0);
        self.vel *= self.air_drag;
        self.clock += dt;
        self.scale_x = wave(-1.0, 1.0, self.clock * self.spin);
        self.ttl -= dt;

        self.opacity > 0.0 && self.ttl > 0.0
    }
}

/// Owns live particles and the shared flutter clock
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    clock: f32,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire-and-forget burst of `config.count` particles at `origin`
    pub fn spawn(&mut self, origin: Vec2, config: &ConfettiConfig, rng: &mut Pcg32) {
        self.particles.reserve(config.count);
        for _ in 0..config.count {
            let particle = self.sample_particle(origin, config, rng);
            self.particles.push(particle);
        }
        log::debug!("Spawned {} confetti particles at {:?}", config.count, origin);
    }

    fn sample_particle(&self, origin: Vec2, config: &ConfettiConfig, rng: &mut Pcg32) -> Particle {
        let shape = if rng.random_bool(0.5) {
            Shape::Rect {
                width: rng.random_range(5.0..20.0),
                height: rng.random_range(5.0..20.0),
            }
        } else {
            Shape::Circle {
                radius: rng.random_range(3.0..10.0),
            }
        };
        let color = config.color.sample(rng);
        let half_spread = config.spread / 2.0;
        let jitter = if half_spread > 0.0 {
            rng.random_range(-half_spread..half_spread)
        } else {
            0.0
        };
        let heading = (config.heading.sample(rng) - 90.0 + jitter).to_radians();
        let speed = config.velocity.sample(rng);

        Particle {
            pos: origin,
            vel: Vec2::new(heading.cos(), heading.sin()) * speed,
            angular_vel: config.angular_velocity.sample(rng),
            rotation: rng.random_range(0.0..360.0),
            opacity: 1.0,
            scale_x: 1.0,
            spin: rng.random_range(DEFAULT_SPIN.0..DEFAULT_SPIN.1),
            clock: self.clock,
            ttl: CONFETTI_LIFESPAN,
            shape,
            color,
            gravity: config.gravity,
            air_drag: config.air_drag,
            fade: config.fade,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.clock += dt;
        self.particles.retain_mut(|p| p.update(dt));
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_spawn_count_matches_config() {
        let mut system = ParticleSystem::new();
        system.spawn(Vec2::ZERO, &ConfettiConfig::default(), &mut rng());
        assert_eq!(system.len(), DEFAULT_COUNT);

        let config = ConfettiConfig {
            count: 7,
            ..Default::default()
        };
        system.spawn(Vec2::ZERO, &config, &mut rng());
        assert_eq!(system.len(), DEFAULT_COUNT + 7);
    }

    #[test]
    fn test_zero_heading_points_up() {
        let config = ConfettiConfig {
            count: 50,
            spread: 0.0,
            ..Default::default()
        };
        let mut system = ParticleSystem::new();
        system.spawn(Vec2::ZERO, &config, &mut rng());
        for p in system.particles() {
            assert!(p.vel.x.abs() < 1e-2 * p.vel.length());
            assert!(p.vel.y < 0.0);
        }
    }

    #[test]
    fn test_defaults_stay_in_ranges() {
        let mut system = ParticleSystem::new();
        system.spawn(Vec2::new(10.0, 20.0), &ConfettiConfig::default(), &mut rng());
        for p in system.particles() {
            let speed = p.vel.length();
            assert!((999.0..=4001.0).contains(&speed));
            assert!((-200.0..=200.0).contains(&p.angular_vel));
            // Heading within +-30 degrees of straight up
            let off_vertical = p.vel.x.atan2(-p.vel.y).to_degrees();
            assert!(off_vertical.abs() <= 30.0 + 1e-3);
            match p.shape {
                Shape::Rect { width, height } => {
                    assert!((5.0..20.0).contains(&width) && (5.0..20.0).contains(&height));
                }
                Shape::Circle { radius } => assert!((3.0..10.0).contains(&radius)),
            }
        }
    }

    #[test]
    fn test_literal_samples() {
        let config = ConfettiConfig {
            count: 3,
            color: Sampled::Literal([1.0, 0.0, 0.0]),
            velocity: Sampled::Literal(100.0),
            angular_velocity: Sampled::Literal(5.0),
            spread: 0.0,
            ..Default::default()
        };
        let mut system = ParticleSystem::new();
        system.spawn(Vec2::ZERO, &config, &mut rng());
        for p in system.particles() {
            assert_eq!(p.color, [1.0, 0.0, 0.0]);
            assert!((p.vel.length() - 100.0).abs() < 1e-3);
            assert_eq!(p.angular_vel, 5.0);
        }
    }

    #[test]
    fn test_single_step_integration() {
        let config = ConfettiConfig {
            count: 1,
            velocity: Sampled::Literal(0.0),
            angular_velocity: Sampled::Literal(10.0),
            ..Default::default()
        };
        let mut system = ParticleSystem::new();
        system.spawn(Vec2::ZERO, &config, &mut rng());
        let before = system.particles()[0].clone();

        system.tick(0.5);
        let p = &system.particles()[0];
        // Gravity applied before the move, drag after
        assert!((p.pos.y - 200.0).abs() < 1e-3);
        assert!((p.vel.y - 400.0 * DEFAULT_AIR_DRAG).abs() < 1e-3);
        assert!((p.rotation - (before.rotation + 5.0)).abs() < 1e-3);
        assert!((p.opacity - 0.85).abs() < 1e-5);
        assert!((-1.0..=1.0).contains(&p.scale_x));
    }

    #[test]
    fn test_opacity_non_increasing_until_removed() {
        let mut system = ParticleSystem::new();
        system.spawn(Vec2::ZERO, &ConfettiConfig::default(), &mut rng());

        let mut last: Vec<f32> = system.particles().iter().map(|p| p.opacity).collect();
        let mut ticks = 0;
        while !system.is_empty() {
            system.tick(SIM_DT);
            ticks += 1;
            for (p, prev) in system.particles().iter().zip(&last) {
                assert!(p.opacity <= *prev);
                assert!(p.opacity > 0.0 && p.ttl > 0.0);
            }
            last = system.particles().iter().map(|p| p.opacity).collect();
            assert!(ticks < 10_000);
        }
        // Fade of 0.3/s empties opacity after ~3.33s, before the 4s lifespan
        let seconds = ticks as f32 * SIM_DT;
        assert!((seconds - 1.0 / DEFAULT_FADE).abs() < 0.05);
    }

    #[test]
    fn test_lifespan_removes_before_fade() {
        let config = ConfettiConfig {
            count: 10,
            fade: 0.0,
            ..Default::default()
        };
        let mut system = ParticleSystem::new();
        system.spawn(Vec2::ZERO, &config, &mut rng());
        for _ in 0..((CONFETTI_LIFESPAN - 0.1) / SIM_DT) as usize {
            system.tick(SIM_DT);
        }
        assert_eq!(system.len(), 10);
        for _ in 0..(0.2 / SIM_DT) as usize {
            system.tick(SIM_DT);
        }
        assert!(system.is_empty());
    }
}
