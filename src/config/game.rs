/// Game configuration constants.
///
/// This module defines the main gameplay parameters such as phase duration,
/// the pre-game countdown, and the tick rate driving both.
pub const PHASE_DURATION: u32 = 10; // Duration of a night turn or of the day, in seconds.

/// Seconds the protagonist has to read their role before the first night starts.
pub const GAME_START_COUNTDOWN: u32 = 30;

/// Interval between two clock ticks, in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Display name used when the protagonist leaves their name blank.
pub const DEFAULT_PLAYER_NAME: &str = "PlayerX";

/// Per-engine settings. `Default` is built from the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub phase_duration: u32,
    pub start_countdown: u32,
    pub sound_enabled: bool,
    /// Hold turn advancement while an action the protagonist sent to the ledger is unacknowledged.
    pub await_ledger_ack: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            phase_duration: PHASE_DURATION,
            start_countdown: GAME_START_COUNTDOWN,
            sound_enabled: true,
            await_ledger_ack: false,
        }
    }
}
