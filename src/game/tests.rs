#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use uuid::Uuid;

    use crate::config::game::{GameConfig, DEFAULT_PLAYER_NAME, GAME_START_COUNTDOWN, PHASE_DURATION};
    use crate::game::actions::{ActionOutcome, PlayerAction};
    use crate::game::error::GameError;
    use crate::game::events::{EventKind, GameEvent};
    use crate::game::roster::{default_table, Death};
    use crate::game::sound::{SoundBuffer, SoundCue, SoundIntent, SoundPort};
    use crate::game::state::GameEngine;
    use crate::game::types::{NightTurn, Phase, PlayerSpec, Role, Stage, Turn};
    use crate::ledger::{LedgerAction, LedgerError, Receipt};

    /// Default table with the protagonist's role swapped for `role`.
    fn table_as(role: Role) -> Vec<PlayerSpec> {
        let mut specs = default_table();
        let me = specs.iter().position(|s| s.is_player).unwrap();
        let other = specs.iter().position(|s| s.role == role).unwrap();
        let mine = specs[me].role;
        specs[me].role = role;
        specs[other].role = mine;
        specs
    }

    fn started(specs: Vec<PlayerSpec>, config: GameConfig) -> GameEngine {
        let mut engine = GameEngine::new(specs, config).unwrap();
        engine.ready().unwrap();
        engine
    }

    /// Tick until the current countdown runs out.
    fn expire<S: SoundPort>(engine: &mut GameEngine<S>) {
        let ticks = engine.game_phase().time_left.max(1);
        for _ in 0..ticks {
            engine.tick().unwrap();
        }
    }

    fn popup_kinds<S: SoundPort>(engine: &GameEngine<S>) -> Vec<EventKind> {
        engine.events.iter().map(|e| e.kind()).collect()
    }

    #[test]
    fn test_first_night_visits_every_role_then_day_breaks() {
        let mut engine = started(default_table(), GameConfig::default());
        let phase = engine.game_phase();
        assert_eq!(phase.phase, Phase::Night);
        assert_eq!(phase.day, 1);

        let mut visited = vec![engine.night_turn().unwrap()];
        for _ in 0..4 {
            expire(&mut engine);
            visited.push(engine.night_turn().unwrap());
        }
        assert_eq!(
            visited,
            vec![NightTurn::Cupid, NightTurn::Guard, NightTurn::Seer, NightTurn::Werewolf, NightTurn::Witch]
        );

        expire(&mut engine);
        let phase = engine.game_phase();
        assert_eq!(phase.phase, Phase::Day);
        assert_eq!(phase.current_turn, Some(Turn::Day));
        assert_eq!(phase.time_left, PHASE_DURATION);
        assert_eq!(phase.day, 1);
        assert_eq!(popup_kinds(&engine), vec![EventKind::Turn; 5]);
    }

    #[test]
    fn test_day_rolls_over_into_second_night_without_cupid() {
        let mut engine = started(default_table(), GameConfig::default());
        for _ in 0..5 {
            expire(&mut engine);
        }
        engine.roster.set_protection(4, true);

        expire(&mut engine);
        let phase = engine.game_phase();
        assert_eq!(phase.phase, Phase::Night);
        assert_eq!(phase.day, 2);
        assert_eq!(phase.current_turn, Some(Turn::Night(NightTurn::Guard)));
        assert_eq!(phase.time_left, PHASE_DURATION);
        assert!(engine.roster().players().iter().all(|p| !p.is_protected));
        assert_eq!(engine.take_ledger_actions().last(), Some(&LedgerAction::EndVoting));
    }

    #[test]
    fn test_vote_closes_without_holding_the_next_night() {
        let config = GameConfig { await_ledger_ack: true, ..GameConfig::default() };
        let mut engine = started(default_table(), config);
        for _ in 0..5 {
            expire(&mut engine);
        }
        engine.take_ledger_actions();

        expire(&mut engine);
        assert_eq!(engine.take_ledger_actions(), vec![LedgerAction::EndVoting]);
        assert_eq!(engine.night_turn(), Some(NightTurn::Guard));
        expire(&mut engine);
        assert_eq!(engine.night_turn(), Some(NightTurn::Seer));
    }

    #[test]
    fn test_closing_turn_popup_resets_clock() {
        let mut engine = started(default_table(), GameConfig::default());
        for _ in 0..3 {
            engine.tick().unwrap();
        }
        assert_eq!(engine.game_phase().time_left, PHASE_DURATION - 3);

        let closed = engine.close_popup().unwrap();
        assert_eq!(closed, GameEvent::Turn { turn: NightTurn::Cupid });
        assert_eq!(engine.game_phase().time_left, PHASE_DURATION);
    }

    #[test]
    fn test_close_popup_on_empty_queue() {
        let mut engine = started(default_table(), GameConfig::default());
        engine.close_popup().unwrap();
        assert_eq!(engine.close_popup(), Err(GameError::EmptyQueue));
    }

    #[test]
    fn test_last_werewolf_death_then_victory_and_single_leave() {
        let mut engine = started(default_table(), GameConfig::default());
        let leaves = Rc::new(Cell::new(0));
        let counter = Rc::clone(&leaves);
        engine.on_leave_game(move || counter.set(counter.get() + 1));

        assert_eq!(engine.eliminate(1), Death::Died);
        assert!(engine.is_game_over());
        assert_eq!(popup_kinds(&engine), vec![EventKind::Turn, EventKind::Death, EventKind::GameOver]);

        // The clock stops once the game is decided.
        let before = engine.game_phase().time_left;
        engine.tick().unwrap();
        assert_eq!(engine.game_phase().time_left, before);

        engine.close_popup().unwrap();
        let death = engine.close_popup().unwrap();
        assert_eq!(death.title(), "A Werewolf Has Died!");
        assert_eq!(leaves.get(), 0);

        let last = engine.close_popup().unwrap();
        assert_eq!(last, GameEvent::GameOver { is_village_win: true });
        assert_eq!(leaves.get(), 1);
        assert_eq!(engine.stage(), Stage::Finished);
        assert_eq!(engine.close_popup(), Err(GameError::EmptyQueue));
        assert_eq!(leaves.get(), 1);
    }

    #[test]
    fn test_eliminating_twice_queues_one_popup() {
        let mut engine = started(default_table(), GameConfig::default());
        assert_eq!(engine.eliminate(7), Death::Died);
        assert_eq!(engine.eliminate(7), Death::Ignored);
        assert_eq!(engine.eliminate(404), Death::Ignored);
        assert_eq!(popup_kinds(&engine), vec![EventKind::Turn, EventKind::Death]);
        assert_eq!(engine.snapshot().dead_count, 1);
    }

    #[test]
    fn test_werewolf_parity_at_start_is_defeat() {
        let specs = vec![
            PlayerSpec::new("W1", Role::Werewolf),
            PlayerSpec::new("W2", Role::Werewolf),
            PlayerSpec::protagonist("S", Role::Seer),
            PlayerSpec::new("V", Role::Villager),
        ];
        let engine = started(specs, GameConfig::default());
        assert_eq!(popup_kinds(&engine), vec![EventKind::Turn, EventKind::GameOver]);
        assert_eq!(engine.events.iter().last(), Some(&GameEvent::GameOver { is_village_win: false }));
    }

    #[test]
    fn test_pre_game_countdown_and_rename() {
        let mut engine = GameEngine::new(default_table(), GameConfig::default()).unwrap();
        assert_eq!(engine.stage(), Stage::PreGame);
        assert_eq!(engine.snapshot().countdown, GAME_START_COUNTDOWN);
        assert!(engine.current_popup().is_none());

        engine.set_protagonist_name("Nadia").unwrap();
        for _ in 0..GAME_START_COUNTDOWN - 1 {
            engine.tick().unwrap();
        }
        assert_eq!(engine.stage(), Stage::PreGame);

        engine.tick().unwrap();
        assert_eq!(engine.stage(), Stage::InProgress);
        assert_eq!(engine.current_popup(), Some(&GameEvent::Turn { turn: NightTurn::Cupid }));
        assert_eq!(engine.roster().protagonist().unwrap().name, "Nadia");
        assert!(matches!(
            engine.set_protagonist_name("Late"),
            Err(GameError::ActionRejected { .. })
        ));
        assert_eq!(
            engine.take_ledger_actions(),
            vec![LedgerAction::StartGame { players: (1..=8).collect() }]
        );
    }

    #[test]
    fn test_blank_name_uses_default() {
        let mut engine = GameEngine::new(default_table(), GameConfig::default()).unwrap();
        engine.set_protagonist_name("").unwrap();
        assert_eq!(engine.roster().protagonist().unwrap().name, DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn test_deaths_before_start_are_announced_on_start() {
        let mut engine = GameEngine::new(default_table(), GameConfig::default()).unwrap();
        engine.eliminate(8);
        assert!(engine.current_popup().is_none());

        engine.ready().unwrap();
        assert_eq!(popup_kinds(&engine), vec![EventKind::Turn, EventKind::Death]);
    }

    #[test]
    fn test_sound_intents_on_phase_flips() {
        let mut engine =
            GameEngine::with_sound(default_table(), GameConfig::default(), SoundBuffer::default()).unwrap();
        engine.ready().unwrap();
        for _ in 0..5 {
            expire(&mut engine);
        }
        assert_eq!(
            engine.sound_mut().drain(),
            vec![SoundIntent::Play(SoundCue::VillageBell), SoundIntent::Play(SoundCue::NightAmbience)]
        );

        expire(&mut engine);
        assert_eq!(
            engine.sound_mut().drain(),
            vec![SoundIntent::Play(SoundCue::WolfHowl), SoundIntent::Pause(SoundCue::NightAmbience)]
        );

        engine.set_sound_enabled(false);
        for _ in 0..5 {
            expire(&mut engine);
        }
        assert!(engine.sound_mut().drain().is_empty());
    }

    #[test]
    fn test_seer_inspects_only_on_own_turn() {
        let mut engine = started(default_table(), GameConfig::default());
        assert!(matches!(
            engine.take_action(PlayerAction::Inspect { target: 1 }),
            Err(GameError::ActionRejected { .. })
        ));

        expire(&mut engine);
        expire(&mut engine);
        assert_eq!(engine.night_turn(), Some(NightTurn::Seer));
        assert_eq!(
            engine.take_action(PlayerAction::Inspect { target: 1 }),
            Ok(ActionOutcome::Revealed { target: 1, role: Role::Werewolf })
        );
        assert!(matches!(
            engine.take_action(PlayerAction::Inspect { target: 2 }),
            Err(GameError::ActionRejected { .. })
        ));
        assert!(matches!(
            engine.take_action(PlayerAction::Kill { target: 2 }),
            Err(GameError::ActionRejected { .. })
        ));
    }

    #[test]
    fn test_guard_protection_lasts_one_night() {
        let mut engine = started(table_as(Role::Guard), GameConfig::default());
        expire(&mut engine);
        assert_eq!(
            engine.take_action(PlayerAction::Protect { target: 3 }),
            Ok(ActionOutcome::Protected { target: 3 })
        );
        assert!(engine.roster().get(3).unwrap().is_protected);

        // Rest of the night, then the day.
        for _ in 0..4 {
            expire(&mut engine);
        }
        assert!(engine.roster().get(3).unwrap().is_protected);
        expire(&mut engine);
        assert_eq!(engine.night_turn(), Some(NightTurn::Guard));
        assert!(!engine.roster().get(3).unwrap().is_protected);
    }

    #[test]
    fn test_day_vote_goes_to_ledger_once() {
        let mut engine = started(default_table(), GameConfig::default());
        assert!(matches!(
            engine.take_action(PlayerAction::Vote { target: 1 }),
            Err(GameError::ActionRejected { .. })
        ));
        for _ in 0..5 {
            expire(&mut engine);
        }

        assert_eq!(
            engine.take_action(PlayerAction::Vote { target: 1 }),
            Ok(ActionOutcome::Submitted { call: LedgerAction::Vote { target: 1 } })
        );
        assert!(matches!(
            engine.take_action(PlayerAction::Vote { target: 2 }),
            Err(GameError::ActionRejected { .. })
        ));
        let calls = engine.take_ledger_actions();
        assert_eq!(calls.last(), Some(&LedgerAction::Vote { target: 1 }));
        assert!(engine.take_ledger_actions().is_empty());
    }

    #[test]
    fn test_cupid_pairs_two_different_living_players() {
        let mut engine = started(table_as(Role::Cupid), GameConfig::default());
        assert!(matches!(
            engine.take_action(PlayerAction::Pair { first: 4, second: 4 }),
            Err(GameError::ActionRejected { .. })
        ));
        assert_eq!(
            engine.take_action(PlayerAction::Pair { first: 4, second: 7 }),
            Ok(ActionOutcome::Submitted { call: LedgerAction::CupidAction { lover1: 4, lover2: 7 } })
        );
    }

    #[test]
    fn test_dead_hunter_takes_revenge_once() {
        let mut engine = started(table_as(Role::Hunter), GameConfig::default());
        assert_eq!(engine.eliminate(3), Death::ProtagonistDied);
        assert!(engine.snapshot().is_player_dead);
        assert_eq!(engine.events.iter().last().unwrap().title(), "You Have Died!");

        assert_eq!(
            engine.take_action(PlayerAction::Revenge { target: 1 }),
            Ok(ActionOutcome::Submitted { call: LedgerAction::HunterAction { target: 1 } })
        );
        assert!(matches!(
            engine.take_action(PlayerAction::Revenge { target: 2 }),
            Err(GameError::ActionRejected { .. })
        ));
    }

    fn receipt_for(call: &LedgerAction) -> Result<Receipt, LedgerError> {
        Ok(Receipt {
            tx_hash: "0x1".to_string(),
            game_id: Uuid::nil(),
            action: call.clone(),
        })
    }

    #[test]
    fn test_turn_advances_without_waiting_for_ledger_by_default() {
        let mut engine = started(table_as(Role::Werewolf), GameConfig::default());
        for _ in 0..3 {
            expire(&mut engine);
        }
        engine.take_action(PlayerAction::Kill { target: 5 }).unwrap();
        expire(&mut engine);
        assert_eq!(engine.night_turn(), Some(NightTurn::Witch));
    }

    #[test]
    fn test_settlement_gated_turn_waits_for_ack() {
        let config = GameConfig { await_ledger_ack: true, ..GameConfig::default() };
        let mut engine = started(table_as(Role::Werewolf), config);
        for _ in 0..3 {
            expire(&mut engine);
        }
        assert_eq!(engine.night_turn(), Some(NightTurn::Werewolf));

        let call = match engine.take_action(PlayerAction::Kill { target: 5 }).unwrap() {
            ActionOutcome::Submitted { call } => call,
            other => panic!("unexpected outcome {other:?}"),
        };
        expire(&mut engine);
        engine.tick().unwrap();
        assert_eq!(engine.night_turn(), Some(NightTurn::Werewolf));
        assert_eq!(engine.game_phase().time_left, 0);

        // An answer for some other call does not release the turn.
        engine
            .acknowledge_action(&LedgerAction::EndVoting, &receipt_for(&LedgerAction::EndVoting))
            .unwrap();
        assert_eq!(engine.night_turn(), Some(NightTurn::Werewolf));

        engine.acknowledge_action(&call, &receipt_for(&call)).unwrap();
        assert_eq!(engine.night_turn(), Some(NightTurn::Witch));
        assert_eq!(engine.game_phase().time_left, PHASE_DURATION);
    }

    #[test]
    fn test_ledger_failure_also_releases_gated_turn() {
        let config = GameConfig { await_ledger_ack: true, ..GameConfig::default() };
        let mut engine = started(table_as(Role::Werewolf), config);
        for _ in 0..3 {
            expire(&mut engine);
        }
        engine.take_action(PlayerAction::Kill { target: 5 }).unwrap();
        expire(&mut engine);

        let failure = Err(LedgerError::Unavailable { reason: "timeout".to_string() });
        engine
            .acknowledge_action(&LedgerAction::NightAction { target: 5 }, &failure)
            .unwrap();
        assert_eq!(engine.night_turn(), Some(NightTurn::Witch));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut engine = started(default_table(), GameConfig::default());
        engine.eliminate(8);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.stage, Stage::InProgress);
        assert_eq!(snapshot.current_turn, Some(Turn::Night(NightTurn::Cupid)));
        assert_eq!(snapshot.pending_popups, 2);
        assert_eq!(snapshot.popup.as_ref().map(|p| p.title.as_str()), Some("Cupid's Turn"));
        assert!(!snapshot.is_player_dead);
        assert_eq!(snapshot.players.len(), 8);
        assert_eq!(snapshot.timer, "0:10");
        assert!(snapshot.alive_roles.contains(&Role::Villager));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["popup"]["kind"], "turn");
        assert_eq!(json["phase"], "night");
    }
}
