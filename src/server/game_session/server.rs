use actix::prelude::*;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::game::{GameConfig, TICK_INTERVAL_MS};
use crate::config::server::IDLE_SESSION_TIMEOUT_SECS;
use crate::game::error::GameError;
use crate::game::sound::SoundBuffer;
use crate::game::state::GameEngine;
use crate::game::types::{PlayerSpec, Stage};
use crate::ledger::Ledger;
use crate::server::game_session::messages::{
    ClientAction, LedgerSettled, ProcessClientMessage, ServerMessage,
};

pub struct ConnectedClient {
    pub username: String,
    pub addr: Recipient<ServerMessage>,
}

/// One running game: owns the engine and drives its clock.
pub struct GameSession {
    pub game_id: Uuid,
    engine: GameEngine<SoundBuffer>,
    clients: HashMap<Uuid, ConnectedClient>,
    /// The client allowed to play. Everyone else spectates.
    controller: Option<Uuid>,
    ledger: Arc<dyn Ledger>,
    manager: Addr<GameSessionManager>,
    idle_timeout: Duration,
    /// Runs only while at least one client is connected.
    tick_timer: Option<SpawnHandle>,
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[GameSession] Started game_id={}", self.game_id);
        ctx.run_later(self.idle_timeout, |act, ctx| {
            if act.clients.is_empty() {
                info!("[GameSession] Nobody joined game_id={}, shutting down", act.game_id);
                act.abandon(ctx);
            }
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[GameSession] Stopped game_id={}", self.game_id);
    }
}

pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
    ledger: Arc<dyn Ledger>,
    idle_timeout: Duration,
}

#[derive(Message)]
#[rtype(result = "Result<Uuid, GameError>")]
pub struct CreateGame {
    pub players: Vec<PlayerSpec>,
    pub config: GameConfig,
}

impl GameSessionManager {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self::with_idle_timeout(ledger, Duration::from_secs(IDLE_SESSION_TIMEOUT_SECS))
    }

    /// Sessions nobody joins within `idle_timeout` are shut down.
    pub fn with_idle_timeout(ledger: Arc<dyn Ledger>, idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ledger,
            idle_timeout,
        }
    }

    pub fn create_game(
        &mut self,
        players: Vec<PlayerSpec>,
        config: GameConfig,
        manager: Addr<GameSessionManager>,
    ) -> Result<Uuid, GameError> {
        let game_id = Uuid::new_v4();
        let mut engine = GameEngine::with_sound(players, config, SoundBuffer::default())?;
        let leave = manager.clone();
        engine.on_leave_game(move || leave.do_send(EndGame { game_id }));

        let session = GameSession {
            game_id,
            engine,
            clients: HashMap::new(),
            controller: None,
            ledger: Arc::clone(&self.ledger),
            manager,
            idle_timeout: self.idle_timeout,
            tick_timer: None,
        }
        .start();

        self.sessions.insert(game_id, session);
        info!("[GameSessionManager] Created game_id={} ({} sessions)", game_id, self.sessions.len());
        Ok(game_id)
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = Result<Uuid, GameError>;

    fn handle(&mut self, msg: CreateGame, ctx: &mut Context<Self>) -> Self::Result {
        self.create_game(msg.players, msg.config, ctx.address())
    }
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, String>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, String>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions
            .get(&msg.game_id)
            .cloned()
            .ok_or_else(|| "Game session not found".to_string())
    }
}

/// Sent by a session's leave callback once its game-over popup is closed, or by a session
/// nobody is connected to any more.
#[derive(Message)]
#[rtype(result = "()")]
pub struct EndGame {
    pub game_id: Uuid,
}

impl Handler<EndGame> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: EndGame, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            info!("[GameSessionManager] Ended game_id={}", msg.game_id);
        } else {
            debug!("[GameSessionManager] EndGame for unknown game_id={}", msg.game_id);
        }
    }
}

impl GameSession {
    fn broadcast(&self, msg: ServerMessage) {
        for client in self.clients.values() {
            client.addr.do_send(msg.clone());
        }
    }

    pub fn send_state(&self) {
        let snapshot = self.engine.snapshot();
        debug!(
            "[GameSession] Broadcast state: game_id={} stage={:?} day={} time_left={} popups={}",
            self.game_id, snapshot.stage, snapshot.day, snapshot.time_left, snapshot.pending_popups
        );
        self.broadcast(ServerMessage::GameStateUpdate(snapshot));
    }

    /// Replace the tick interval. Any previous interval is cancelled first, so the next tick
    /// lands one full interval from now.
    fn schedule_ticks(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.tick_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_interval(Duration::from_millis(TICK_INTERVAL_MS), |act, ctx| {
            let result = act.engine.tick();
            act.after_mutation(ctx, result);
        });
        self.tick_timer = Some(handle);
    }

    /// Push everything a mutation produced out to the ledger and the clients.
    fn after_mutation(&mut self, ctx: &mut Context<Self>, result: Result<(), GameError>) {
        if let Err(e) = result {
            error!("[GameSession] Engine error: game_id={} err={}", self.game_id, e);
            self.broadcast(ServerMessage::game_error(&e, self.game_id));
        }

        self.submit_ledger_actions(ctx);
        for intent in self.engine.sound_mut().drain() {
            self.broadcast(ServerMessage::Sound(intent));
        }
        self.send_state();

        if self.engine.stage() == Stage::Finished {
            self.finish(ctx);
        }
    }

    fn submit_ledger_actions(&mut self, ctx: &mut Context<Self>) {
        for call in self.engine.take_ledger_actions() {
            debug!("[GameSession] Submitting {} for game_id={}", call.kind(), self.game_id);
            let ledger = Arc::clone(&self.ledger);
            let game_id = self.game_id;
            let addr = ctx.address();
            actix::spawn(async move {
                let result = ledger.submit_action(game_id, call.clone()).await;
                addr.do_send(LedgerSettled { call, result });
            });
        }
    }

    fn stop_ticks(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.tick_timer.take() {
            ctx.cancel_future(handle);
        }
    }

    fn finish(&mut self, ctx: &mut Context<Self>) {
        self.stop_ticks(ctx);
        self.broadcast(ServerMessage::GameEnded { game_id: self.game_id });
        ctx.stop();
    }

    /// Drop the game without a result: nobody is left to play or watch it.
    fn abandon(&mut self, ctx: &mut Context<Self>) {
        self.stop_ticks(ctx);
        self.manager.do_send(EndGame { game_id: self.game_id });
        ctx.stop();
    }

    fn apply(&mut self, action: ClientAction, addr: &Recipient<ServerMessage>) -> Result<(), GameError> {
        match action {
            ClientAction::SetName { name } => self.engine.set_protagonist_name(&name),
            ClientAction::Ready => self.engine.ready(),
            ClientAction::ClosePopup => self.engine.close_popup().map(|_| ()),
            ClientAction::Act(action) => {
                let outcome = self.engine.take_action(action)?;
                addr.do_send(ServerMessage::ActionResult(outcome));
                Ok(())
            }
            ClientAction::Eliminate { player_id } => {
                self.engine.eliminate(player_id);
                Ok(())
            }
            ClientAction::ToggleSound { enabled } => {
                self.engine.set_sound_enabled(enabled);
                Ok(())
            }
            ClientAction::Chat { .. } | ClientAction::Ping => Ok(()),
        }
    }

    fn relay_chat(&self, client_id: Uuid, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }
        let sender = self
            .clients
            .get(&client_id)
            .map(|c| c.username.clone())
            .unwrap_or_default();
        self.broadcast(ServerMessage::Chat {
            sender,
            message: message.to_string(),
        });
    }
}

impl Handler<ProcessClientMessage> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ProcessClientMessage, ctx: &mut Context<Self>) -> Self::Result {
        match msg.msg {
            ClientAction::Chat { message } => self.relay_chat(msg.client_id, &message),
            ClientAction::Ping => {}
            action if self.controller != Some(msg.client_id) => {
                warn!(
                    "[GameSession] Spectator {} tried to send {:?} in game_id={}",
                    msg.client_id, action, self.game_id
                );
                msg.addr.do_send(ServerMessage::error(
                    "SPECTATOR",
                    "Spectators cannot send commands",
                    Some(&self.game_id.to_string()),
                ));
            }
            action => {
                let was_pre_game = self.engine.stage() == Stage::PreGame;
                let result = self.apply(action, &msg.addr);
                let started_now = was_pre_game && self.engine.stage() != Stage::PreGame;
                match &result {
                    // The first turn gets a full first second.
                    Ok(()) if started_now => self.schedule_ticks(ctx),
                    Ok(()) => {}
                    Err(e) => {
                        warn!("[GameSession] Rejected command: game_id={} err={}", self.game_id, e);
                        msg.addr.do_send(ServerMessage::game_error(e, self.game_id));
                    }
                }
                self.after_mutation(ctx, Ok(()));
            }
        }
    }
}

impl Handler<LedgerSettled> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: LedgerSettled, ctx: &mut Context<Self>) -> Self::Result {
        match &msg.result {
            Ok(receipt) => self.broadcast(ServerMessage::LedgerReceipt(receipt.clone())),
            Err(e) => self.broadcast(ServerMessage::error(
                "LEDGER_ERROR",
                &e.to_string(),
                Some(&self.game_id.to_string()),
            )),
        }
        let result = self.engine.acknowledge_action(&msg.call, &msg.result);
        self.after_mutation(ctx, result);
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterSession {
    pub client_id: Uuid,
    pub username: String,
    pub addr: Recipient<ServerMessage>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct UnregisterSession {
    pub client_id: Uuid,
}

impl Handler<RegisterSession> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: RegisterSession, ctx: &mut Context<Self>) -> Self::Result {
        if self.tick_timer.is_none() {
            self.schedule_ticks(ctx);
        }
        if self.controller.is_none() {
            self.controller = Some(msg.client_id);
        }
        info!(
            "[GameSession] {} joined game_id={} as {}",
            msg.username,
            self.game_id,
            if self.controller == Some(msg.client_id) { "player" } else { "spectator" }
        );
        msg.addr.do_send(ServerMessage::GameStateUpdate(self.engine.snapshot()));
        self.clients.insert(
            msg.client_id,
            ConnectedClient {
                username: msg.username,
                addr: msg.addr,
            },
        );
    }
}

impl Handler<UnregisterSession> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: UnregisterSession, ctx: &mut Context<Self>) -> Self::Result {
        self.clients.remove(&msg.client_id);
        if self.clients.is_empty() {
            info!("[GameSession] Last client left game_id={}, shutting down", self.game_id);
            self.abandon(ctx);
            return;
        }
        if self.controller == Some(msg.client_id) {
            // Hand control to whoever is still watching.
            self.controller = self.clients.keys().next().copied();
        }
    }
}
