//! Audio requests
//!
//! The simulation only emits [`GameEvent`]s. [`AudioManager`] turns them into
//! sound requests with volumes taken from settings and hands them to an
//! [`AudioSink`] owned by the presentation layer.

use crate::content::sounds;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Key picked up
    Score,
    /// Run complete
    Won,
    /// Touched by a ghost
    Weak,
    /// Portal taken to the next level
    Portal,
    /// Looping background track
    Background,
}

impl SoundEffect {
    /// Asset id resolved by the presentation layer
    pub fn asset(self) -> &'static str {
        match self {
            SoundEffect::Score => sounds::SCORE,
            SoundEffect::Won => sounds::WON,
            SoundEffect::Weak => sounds::WEAK,
            SoundEffect::Portal => sounds::PORTAL,
            SoundEffect::Background => sounds::BACKGROUND,
        }
    }

    pub fn is_music(self) -> bool {
        self == SoundEffect::Background
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    pub volume: f32,
    pub looped: bool,
}

/// Plays sounds by asset id
pub trait AudioSink {
    fn play(&mut self, sound: &str, options: PlaybackOptions);
}

/// Sink that only logs requests, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, sound: &str, options: PlaybackOptions) {
        log::debug!(
            "play {} (volume {:.2}{})",
            sound,
            options.volume,
            if options.looped { ", looped" } else { "" }
        );
    }
}

/// Audio manager for the game
///
/// Channel volumes already include the master volume and mute flag.
#[derive(Debug, Clone)]
pub struct AudioManager {
    sfx_volume: f32,
    music_volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
        }
    }

    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if effect.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        }
    }

    /// Sound triggered by an event, if any
    pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::MusicStarted => Some(SoundEffect::Background),
            GameEvent::KeyCollected { .. } => Some(SoundEffect::Score),
            GameEvent::GhostHit => Some(SoundEffect::Weak),
            GameEvent::PortalEntered { .. } => Some(SoundEffect::Portal),
            GameEvent::Won => Some(SoundEffect::Won),
            _ => None,
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect, sink: &mut dyn AudioSink) {
        let volume = self.effective_volume(effect);
        if volume <= 0.0 {
            return;
        }
        sink.play(
            effect.asset(),
            PlaybackOptions {
                volume,
                looped: effect.is_music(),
            },
        );
    }

    /// Play the sounds for a batch of drained events, in order
    pub fn dispatch(&self, events: &[GameEvent], sink: &mut dyn AudioSink) {
        for effect in events.iter().filter_map(Self::sound_for) {
            self.play(effect, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(String, PlaybackOptions)>);

    impl AudioSink for Recorder {
        fn play(&mut self, sound: &str, options: PlaybackOptions) {
            self.0.push((sound.to_string(), options));
        }
    }

    #[test]
    fn test_events_map_to_sounds() {
        let manager = AudioManager::default();
        let mut sink = Recorder::default();
        manager.dispatch(
            &[
                GameEvent::MusicStarted,
                GameEvent::KeyCollected { total: 1 },
                GameEvent::PortalLocked,
                GameEvent::GhostHit,
                GameEvent::PortalEntered { next_level: 1 },
                GameEvent::Won,
            ],
            &mut sink,
        );

        let names: Vec<&str> = sink.0.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, ["backgroundaudio", "score", "weak", "portalsound", "won"]);
        assert!(sink.0[0].1.looped);
        assert!(!sink.0[1].1.looped);
    }

    #[test]
    fn test_volume_from_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            music_volume: 1.0,
            ..Settings::default()
        };
        let manager = AudioManager::new(&settings);
        let mut sink = Recorder::default();
        manager.play(SoundEffect::Score, &mut sink);
        manager.play(SoundEffect::Background, &mut sink);
        assert_eq!(sink.0[0].1.volume, 0.25);
        assert_eq!(sink.0[1].1.volume, 0.5);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let manager = AudioManager::new(&Settings {
            muted: true,
            ..Settings::default()
        });
        let mut sink = Recorder::default();
        manager.dispatch(&[GameEvent::MusicStarted, GameEvent::Won], &mut sink);
        assert!(sink.0.is_empty());
    }
}
