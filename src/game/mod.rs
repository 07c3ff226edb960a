pub mod actions;
pub mod error;
pub mod events;
pub mod phase_clock;
pub mod roster;
pub mod sound;
pub mod state;
pub mod turn_sequencer;
pub mod types;
pub mod win;
pub mod tests;
