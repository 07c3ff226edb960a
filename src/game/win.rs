//! Death announcements and win conditions, evaluated after every roster mutation.

use log::info;

use crate::game::events::{EventQueue, GameEvent};
use crate::game::roster::Roster;

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Death popups were queued. Win conditions are left for the next pass.
    Deaths(usize),
    GameOver { is_village_win: bool },
    Continue,
}

/// Run a single pass.
///
/// Pending death announcements win over game over: a pass that queues deaths never also
/// queues the game-over popup, even when the game is already decided.
pub fn evaluate(roster: &mut Roster, queue: &mut EventQueue) -> Verdict {
    let deaths = announce_deaths(roster, queue);
    if deaths > 0 {
        return Verdict::Deaths(deaths);
    }

    let werewolves = roster.alive_werewolves();
    let others = roster.alive_non_werewolves();

    let verdict = if werewolves == 0 {
        Verdict::GameOver { is_village_win: true }
    } else if others == 0 || werewolves >= others {
        Verdict::GameOver { is_village_win: false }
    } else {
        Verdict::Continue
    };

    if let Verdict::GameOver { is_village_win } = verdict {
        info!(
            "[WinEvaluator] Game over: village_win={} werewolves={} others={}",
            is_village_win, werewolves, others
        );
        queue.enqueue(GameEvent::GameOver { is_village_win });
    }
    verdict
}

/// Queue one death popup per unannounced death, in roster order. Returns how many were queued.
pub fn announce_deaths(roster: &mut Roster, queue: &mut EventQueue) -> usize {
    let deaths = roster.take_undisplayed_deaths();
    for player in &deaths {
        info!("[WinEvaluator] Death announced: player={} role={}", player.name, player.role);
        queue.enqueue(GameEvent::death(player));
    }
    deaths.len()
}

/// Run passes until one queues no deaths. Returns the final pass.
pub fn evaluate_to_fixpoint(roster: &mut Roster, queue: &mut EventQueue) -> Verdict {
    loop {
        match evaluate(roster, queue) {
            Verdict::Deaths(_) => continue,
            verdict => return verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::EventKind;
    use crate::game::roster::default_table;
    use crate::game::types::{PlayerSpec, Role};

    fn kinds(queue: &EventQueue) -> Vec<EventKind> {
        queue.iter().map(|e| e.kind()).collect()
    }

    #[test]
    fn test_no_event_while_game_is_open() {
        let mut roster = Roster::new(default_table()).unwrap();
        let mut queue = EventQueue::new();
        assert_eq!(evaluate(&mut roster, &mut queue), Verdict::Continue);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_death_pass_precedes_game_over_pass() {
        let mut roster = Roster::new(default_table()).unwrap();
        let mut queue = EventQueue::new();
        roster.mark_dead(1);

        assert_eq!(evaluate(&mut roster, &mut queue), Verdict::Deaths(1));
        assert_eq!(kinds(&queue), vec![EventKind::Death]);

        assert_eq!(evaluate(&mut roster, &mut queue), Verdict::GameOver { is_village_win: true });
        assert_eq!(kinds(&queue), vec![EventKind::Death, EventKind::GameOver]);
    }

    #[test]
    fn test_tie_favors_werewolves() {
        let specs = vec![
            PlayerSpec::new("W1", Role::Werewolf),
            PlayerSpec::new("W2", Role::Werewolf),
            PlayerSpec::protagonist("S", Role::Seer),
            PlayerSpec::new("V", Role::Villager),
        ];
        let mut roster = Roster::new(specs).unwrap();
        let mut queue = EventQueue::new();

        assert_eq!(evaluate(&mut roster, &mut queue), Verdict::GameOver { is_village_win: false });
        assert_eq!(queue.peek_front(), Some(&GameEvent::GameOver { is_village_win: false }));
    }

    #[test]
    fn test_simultaneous_deaths_queue_in_roster_order_before_game_over() {
        let mut roster = Roster::new(default_table()).unwrap();
        let mut queue = EventQueue::new();
        for id in [8, 7, 6, 5] {
            roster.mark_dead(id);
        }

        let verdict = evaluate_to_fixpoint(&mut roster, &mut queue);
        assert_eq!(verdict, Verdict::Continue);

        // 1 werewolf against 3 others: still open. Kill two more.
        roster.mark_dead(4);
        roster.mark_dead(2);
        let verdict = evaluate_to_fixpoint(&mut roster, &mut queue);
        assert_eq!(verdict, Verdict::GameOver { is_village_win: false });

        let names: Vec<String> = queue
            .iter()
            .filter_map(|e| match e {
                GameEvent::Death { player_name, .. } => Some(player_name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Grace", "Olivia", "James", "Sophie", "Luna", "Alex"]);
        assert_eq!(queue.iter().last().map(|e| e.kind()), Some(EventKind::GameOver));
    }

    #[test]
    fn test_repeated_death_is_not_announced_twice() {
        let mut roster = Roster::new(default_table()).unwrap();
        let mut queue = EventQueue::new();
        roster.mark_dead(7);
        evaluate_to_fixpoint(&mut roster, &mut queue);
        roster.mark_dead(7);
        evaluate_to_fixpoint(&mut roster, &mut queue);
        assert_eq!(queue.len(), 1);
    }
}
