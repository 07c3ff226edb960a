//! Sound intents emitted on phase transitions.
//!
//! The engine never touches a playback device; it tells a `SoundPort` what should be
//! heard and the port decides how (or whether) to play it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    NightAmbience,
    WolfHowl,
    VillageBell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "cue", rename_all = "snake_case")]
pub enum SoundIntent {
    Play(SoundCue),
    Pause(SoundCue),
}

pub trait SoundPort {
    fn emit(&mut self, intent: SoundIntent);
}

/// Drops every intent.
#[derive(Debug, Default)]
pub struct Muted;

impl SoundPort for Muted {
    fn emit(&mut self, _intent: SoundIntent) {}
}

/// Buffers intents until the owner drains them (e.g. to forward to clients).
#[derive(Debug, Default)]
pub struct SoundBuffer {
    pending: Vec<SoundIntent>,
}

impl SoundBuffer {
    pub fn drain(&mut self) -> Vec<SoundIntent> {
        std::mem::take(&mut self.pending)
    }
}

impl SoundPort for SoundBuffer {
    fn emit(&mut self, intent: SoundIntent) {
        self.pending.push(intent);
    }
}
