//! Roster of the players seated at one game.
//!
//! Roles are fixed at creation and a player's status only ever moves from alive to dead.
//! Derived counts are computed on demand, never cached.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::game::DEFAULT_PLAYER_NAME;
use crate::game::error::GameError;
use crate::game::types::{Player, PlayerId, PlayerSpec, PlayerStatus, Role};

/// Result of marking a player dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Death {
    /// Unknown id or already dead. Nothing changed.
    Ignored,
    Died,
    ProtagonistDied,
}

impl Death {
    pub fn changed(&self) -> bool {
        !matches!(self, Death::Ignored)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Build a roster from seat descriptions. Ids are assigned 1..=n in seat order.
    ///
    /// Exactly one seat must be the protagonist. Names do not need to be unique.
    pub fn new(specs: Vec<PlayerSpec>) -> Result<Self, GameError> {
        let protagonists = specs.iter().filter(|s| s.is_player).count();
        match protagonists {
            1 => {}
            0 => return Err(GameError::invalid_roster("no protagonist in roster")),
            n => return Err(GameError::invalid_roster(format!("{n} protagonists in roster, expected 1"))),
        }

        let players = specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| Player::new((i + 1) as PlayerId, spec.name, spec.role, spec.is_player))
            .collect();

        Ok(Self { players })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn protagonist(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_player)
    }

    /// Mark a player dead. Idempotent: a second call for the same player is ignored.
    pub fn mark_dead(&mut self, id: PlayerId) -> Death {
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return Death::Ignored;
        };
        if !player.is_alive() {
            return Death::Ignored;
        }
        player.status = PlayerStatus::Dead;
        if player.is_player { Death::ProtagonistDied } else { Death::Died }
    }

    /// Count alive players whose role matches the predicate.
    pub fn alive_count(&self, predicate: impl Fn(Role) -> bool) -> usize {
        self.players
            .iter()
            .filter(|p| p.is_alive() && predicate(p.role))
            .count()
    }

    pub fn alive_werewolves(&self) -> usize {
        self.alive_count(|role| role == Role::Werewolf)
    }

    pub fn alive_non_werewolves(&self) -> usize {
        self.alive_count(|role| role != Role::Werewolf)
    }

    pub fn dead_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_alive()).count()
    }

    /// Roles that still have at least one living holder, in card display order.
    pub fn alive_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.alive_count(|r| r == *role) > 0)
            .collect()
    }

    /// Returns false if the id is unknown.
    pub fn set_protection(&mut self, id: PlayerId, value: bool) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                player.is_protected = value;
                true
            }
            None => false,
        }
    }

    pub fn clear_protection(&mut self) {
        for player in &mut self.players {
            player.is_protected = false;
        }
    }

    /// Rename the protagonist. A blank name falls back to the default display name.
    pub fn rename_protagonist(&mut self, name: &str) {
        let name = match name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            trimmed => trimmed,
        };
        if let Some(player) = self.players.iter_mut().find(|p| p.is_player) {
            player.name = name.to_string();
        }
    }

    /// Dead players whose death has not been announced yet, in roster order.
    /// They are flagged as announced in the same step.
    pub fn take_undisplayed_deaths(&mut self) -> Vec<Player> {
        self.players
            .iter_mut()
            .filter(|p| !p.is_alive() && !p.has_death_popup_shown)
            .map(|p| {
                p.has_death_popup_shown = true;
                p.clone()
            })
            .collect()
    }
}

/// The eight-seat table a new session is created with.
pub fn default_table() -> Vec<PlayerSpec> {
    vec![
        PlayerSpec::new("Emma", Role::Werewolf),
        PlayerSpec::new("Luna", Role::Witch),
        PlayerSpec::protagonist(DEFAULT_PLAYER_NAME, Role::Seer),
        PlayerSpec::new("Alex", Role::Guard),
        PlayerSpec::new("Grace", Role::Hunter),
        PlayerSpec::new("Olivia", Role::Cupid),
        PlayerSpec::new("James", Role::Villager),
        PlayerSpec::new("Sophie", Role::Villager),
    ]
}

/// Shuffle the roles across the given seats. Names and the protagonist seat stay put.
pub fn deal_roles<R: Rng + ?Sized>(specs: &mut [PlayerSpec], rng: &mut R) {
    let mut roles: Vec<Role> = specs.iter().map(|s| s.role).collect();
    roles.shuffle(rng);
    for (spec, role) in specs.iter_mut().zip(roles) {
        spec.role = role;
    }
}
