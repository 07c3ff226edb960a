//! Game engine: the day/night state machine for one session.
//!
//! The engine owns the roster, the phase clock and the popup queue. Every mutation is a
//! single synchronous step; roster mutations run the win evaluator before returning.

use log::{debug, info};
use serde::Serialize;

use crate::config::game::GameConfig;
use crate::game::actions::ActionLog;
use crate::game::error::GameError;
use crate::game::events::{EventKind, EventQueue, GameEvent, PopupView};
use crate::game::phase_clock::{format_time, ClockState, PhaseClock};
use crate::game::roster::{Death, Roster};
use crate::game::sound::{Muted, SoundCue, SoundIntent, SoundPort};
use crate::game::turn_sequencer;
use crate::game::types::{GamePhase, NightTurn, Phase, Player, PlayerId, PlayerSpec, Role, Stage, Turn};
use crate::game::win::{self, Verdict};
use crate::ledger::LedgerAction;

/// Read-only view handed to the display layer.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub stage: Stage,
    pub countdown: u32,
    pub phase: Phase,
    pub day: u32,
    pub time_left: u32,
    /// `time_left` as `m:ss`.
    pub timer: String,
    pub current_turn: Option<Turn>,
    pub players: Vec<Player>,
    pub popup: Option<PopupView>,
    pub pending_popups: usize,
    pub is_player_dead: bool,
    pub dead_count: usize,
    pub alive_roles: Vec<Role>,
    pub sound_enabled: bool,
}

pub struct GameEngine<S: SoundPort = Muted> {
    pub(crate) config: GameConfig,
    pub(crate) stage: Stage,
    countdown: u32,
    pub(crate) phase: Phase,
    pub(crate) day: u32,
    pub(crate) current_turn: Option<Turn>,
    pub(crate) clock: PhaseClock,
    pub(crate) roster: Roster,
    pub(crate) events: EventQueue,
    pub(crate) actions: ActionLog,
    pub(crate) ledger_outbox: Vec<LedgerAction>,
    game_over: bool,
    sound: S,
    sound_enabled: bool,
    on_leave: Option<Box<dyn FnOnce()>>,
}

impl GameEngine<Muted> {
    pub fn new(specs: Vec<PlayerSpec>, config: GameConfig) -> Result<Self, GameError> {
        Self::with_sound(specs, config, Muted)
    }
}

impl<S: SoundPort> GameEngine<S> {
    pub fn with_sound(specs: Vec<PlayerSpec>, config: GameConfig, sound: S) -> Result<Self, GameError> {
        let roster = Roster::new(specs)?;
        Ok(Self {
            config,
            stage: Stage::PreGame,
            countdown: config.start_countdown,
            phase: Phase::Night,
            day: 1,
            current_turn: None,
            clock: PhaseClock::new(config.phase_duration),
            roster,
            events: EventQueue::new(),
            actions: ActionLog::default(),
            ledger_outbox: Vec::new(),
            game_over: false,
            sound,
            sound_enabled: config.sound_enabled,
            on_leave: None,
        })
    }

    /// Register the callback run when the game-over popup is closed. It runs at most once.
    pub fn on_leave_game(&mut self, callback: impl FnOnce() + 'static) {
        self.on_leave = Some(Box::new(callback));
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn game_phase(&self) -> GamePhase {
        GamePhase {
            phase: self.phase,
            day: self.day,
            time_left: self.clock.time_left(),
            current_turn: self.current_turn,
        }
    }

    pub fn night_turn(&self) -> Option<NightTurn> {
        self.game_phase().night_turn()
    }

    pub fn current_popup(&self) -> Option<&GameEvent> {
        self.events.peek_front()
    }

    pub fn pending_popups(&self) -> usize {
        self.events.len()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Ledger calls queued since the last drain, oldest first.
    pub fn take_ledger_actions(&mut self) -> Vec<LedgerAction> {
        std::mem::take(&mut self.ledger_outbox)
    }

    /// Rename the protagonist. Only allowed before the game starts.
    pub fn set_protagonist_name(&mut self, name: &str) -> Result<(), GameError> {
        if self.stage != Stage::PreGame {
            return Err(GameError::rejected("names are fixed once the game has started"));
        }
        self.roster.rename_protagonist(name);
        Ok(())
    }

    /// The protagonist is ready: start without waiting for the countdown.
    pub fn ready(&mut self) -> Result<(), GameError> {
        if self.stage != Stage::PreGame {
            debug!("[GameEngine] Ready ignored, game already started");
            return Ok(());
        }
        self.start()
    }

    /// One second of wall-clock time.
    pub fn tick(&mut self) -> Result<(), GameError> {
        match self.stage {
            Stage::PreGame => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    self.start()?;
                }
                Ok(())
            }
            Stage::InProgress if self.game_over => {
                debug!("[GameEngine] Tick ignored, game is decided");
                Ok(())
            }
            Stage::InProgress => match self.clock.tick() {
                ClockState::Running => Ok(()),
                ClockState::Expired => self.on_clock_expired(),
            },
            Stage::Finished => {
                debug!("[GameEngine] Tick ignored, game finished");
                Ok(())
            }
        }
    }

    /// Close the popup on screen.
    ///
    /// Closing a turn popup restarts the countdown; closing the game-over popup leaves the game.
    pub fn close_popup(&mut self) -> Result<GameEvent, GameError> {
        let event = self.events.close_front()?;
        match event.kind() {
            EventKind::Turn => self.clock.reset(),
            EventKind::GameOver => self.leave_game(),
            EventKind::Death => {}
        }
        Ok(event)
    }

    /// Mark a player dead, then run the win evaluator to fixpoint.
    pub fn eliminate(&mut self, id: PlayerId) -> Death {
        let death = self.roster.mark_dead(id);
        match death {
            Death::Ignored => debug!("[GameEngine] Eliminate ignored for player={}", id),
            Death::Died => info!("[GameEngine] Player {} died", id),
            Death::ProtagonistDied => info!("[GameEngine] Protagonist (player={}) died", id),
        }
        if death.changed() {
            self.settle();
        }
        death
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let phase = self.game_phase();
        GameSnapshot {
            stage: self.stage,
            countdown: self.countdown,
            phase: phase.phase,
            day: phase.day,
            time_left: phase.time_left,
            timer: format_time(phase.time_left),
            current_turn: phase.current_turn,
            players: self.roster.players().to_vec(),
            popup: self.events.peek_front().map(PopupView::from),
            pending_popups: self.pending_popups(),
            is_player_dead: self.roster.protagonist().is_some_and(|p| !p.is_alive()),
            dead_count: self.roster.dead_count(),
            alive_roles: self.roster.alive_roles(),
            sound_enabled: self.sound_enabled,
        }
    }

    fn start(&mut self) -> Result<(), GameError> {
        self.stage = Stage::InProgress;
        self.countdown = 0;
        info!("[GameEngine] Game started with {} players", self.roster.len());

        let players = self.roster.players().iter().map(|p| p.id).collect();
        self.ledger_outbox.push(LedgerAction::StartGame { players });

        self.begin_night()?;
        self.settle();
        Ok(())
    }

    pub(crate) fn on_clock_expired(&mut self) -> Result<(), GameError> {
        if self.config.await_ledger_ack && self.actions.awaiting_ack.is_some() {
            if !self.actions.expiry_deferred {
                debug!("[GameEngine] Turn end held until the ledger acknowledges the pending action");
            }
            self.actions.expiry_deferred = true;
            return Ok(());
        }
        match self.phase {
            Phase::Night => self.advance_night(),
            Phase::Day => self.begin_next_night(),
        }
    }

    fn advance_night(&mut self) -> Result<(), GameError> {
        match turn_sequencer::advance(self.night_turn(), self.day)? {
            Some(turn) => self.assign_turn(turn),
            None => self.begin_day(),
        }
        Ok(())
    }

    fn assign_turn(&mut self, turn: NightTurn) {
        self.current_turn = Some(Turn::Night(turn));
        self.actions.new_turn();
        self.clock.reset();
        info!("[GameEngine] Night {}: {}'s turn", self.day, turn);
        self.events.enqueue(GameEvent::Turn { turn });
    }

    /// Protection from the previous night is cleared before the first turn is handed out.
    fn begin_night(&mut self) -> Result<(), GameError> {
        self.phase = Phase::Night;
        self.current_turn = None;
        self.roster.clear_protection();
        self.advance_night()
    }

    fn begin_day(&mut self) {
        self.phase = Phase::Day;
        self.current_turn = Some(Turn::Day);
        self.actions.new_day();
        self.clock.reset();
        info!("[GameEngine] Day {} begins", self.day);
        self.emit_sound(SoundIntent::Play(SoundCue::VillageBell));
        self.emit_sound(SoundIntent::Play(SoundCue::NightAmbience));
    }

    /// Closes the day's vote on the ledger, then starts the next night.
    fn begin_next_night(&mut self) -> Result<(), GameError> {
        self.ledger_outbox.push(LedgerAction::EndVoting);
        self.day += 1;
        self.clock.reset();
        info!("[GameEngine] Night falls, day counter now {}", self.day);
        self.emit_sound(SoundIntent::Play(SoundCue::WolfHowl));
        self.emit_sound(SoundIntent::Pause(SoundCue::NightAmbience));
        self.begin_night()
    }

    /// Announce pending deaths, then check win conditions. Nothing runs before the game starts.
    fn settle(&mut self) {
        if self.stage != Stage::InProgress {
            return;
        }
        if self.game_over {
            win::announce_deaths(&mut self.roster, &mut self.events);
            return;
        }
        if let Verdict::GameOver { .. } = win::evaluate_to_fixpoint(&mut self.roster, &mut self.events) {
            self.game_over = true;
        }
    }

    fn leave_game(&mut self) {
        self.stage = Stage::Finished;
        if let Some(callback) = self.on_leave.take() {
            info!("[GameEngine] Leaving game");
            callback();
        }
    }

    fn emit_sound(&mut self, intent: SoundIntent) {
        if self.sound_enabled {
            self.sound.emit(intent);
        }
    }
}
