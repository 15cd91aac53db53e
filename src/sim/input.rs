//! Move attempts
//!
//! A direction press becomes at most one state transition per beat. Failed
//! moves cost battery and the streak but leave `move_ready` set; only a
//! successful move spends the beat.

use super::maze::{Direction, can_move};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// What a move attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not running, paused, or the beat's move was already used
    Ignored,
    /// Destination outside the maze
    OutOfBounds,
    /// Destination blocked by a wall
    WallHit,
    /// Player moved
    Moved,
    /// Player reached the exit; the next level is already built
    LevelComplete { bonus: u64 },
}

impl MoveOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, MoveOutcome::OutOfBounds | MoveOutcome::WallHit)
    }
}

/// Try to move the player one cell in `dir`
pub fn attempt_move(state: &mut GameState, dir: Direction, now_ms: f64) -> MoveOutcome {
    if state.phase != GamePhase::Running || !state.move_ready {
        return MoveOutcome::Ignored;
    }

    let rows = state.maze.rows();
    let cols = state.maze.cols();
    let Some(dest) = state.player.step(dir, cols, rows) else {
        fail_move(state);
        return MoveOutcome::OutOfBounds;
    };

    if !can_move(&state.maze, state.player.x, state.player.y, dir) {
        fail_move(state);
        return MoveOutcome::WallHit;
    }

    state.player = dest;
    state.move_ready = false;
    state.moved_this_beat = true;

    if dest == state.exit {
        let bonus = state.next_level(now_ms);
        return MoveOutcome::LevelComplete { bonus };
    }

    state.move_count += 1;
    if state.level > MOVE_COST_FREE_LEVELS && state.move_count % MOVE_COST_INTERVAL == 0 {
        let cost = state.level / MOVE_COST_LEVEL_DIVISOR;
        state.drain_battery(cost);
        log::debug!("Move {} cost {} battery", state.move_count, cost);
    }

    state.extend_streak();
    state.push_event(GameEvent::MoveFeedback);
    MoveOutcome::Moved
}

fn fail_move(state: &mut GameState) {
    let penalty = state.params.wall_penalty;
    state.drain_battery(penalty);
    state.reset_streak();
    state.moved_this_beat = true;
    state.push_event(GameEvent::WallHit);
    log::debug!("Bumped a wall: -{} battery, {} left", penalty, state.battery);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::{Maze, Position};
    use proptest::prelude::*;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start(0.0);
        state.drain_events();
        state
    }

    /// First open direction out of the player's cell that does not lead to the exit
    fn open_direction(state: &GameState) -> Option<Direction> {
        let cell = state.maze.cell(state.player);
        Direction::ALL.into_iter().find(|&d| {
            cell.is_open(d)
                && state.player.step(d, state.maze.cols(), state.maze.rows()) != Some(state.exit)
        })
    }

    #[test]
    fn test_north_from_origin_is_out_of_bounds() {
        let mut state = running(9);
        state.streak = 3;
        let outcome = attempt_move(&mut state, Direction::North, 0.0);
        assert_eq!(outcome, MoveOutcome::OutOfBounds);
        assert_eq!(state.battery(), 95);
        assert_eq!(state.streak(), 0);
        assert!(state.move_ready());
        assert_eq!(state.player(), Position::ORIGIN);
        assert!(state.drain_events().contains(&GameEvent::WallHit));
    }

    #[test]
    fn test_wall_hit() {
        let mut state = running(9);
        // Player boxed in: every wall standing
        state.maze = Maze::closed(15, 15);
        let outcome = attempt_move(&mut state, Direction::East, 0.0);
        assert_eq!(outcome, MoveOutcome::WallHit);
        assert_eq!(state.battery(), 95);
        assert!(state.move_ready());
        assert!(state.moved_this_beat);
        // A failed move still counts as using the beat, so the beat keeps the streak state
        let beat = state.on_beat();
        assert!(!beat.streak_reset);
    }

    #[test]
    fn test_successful_move_spends_beat() {
        let mut state = running(4);
        let dir = open_direction(&state).unwrap();
        let outcome = attempt_move(&mut state, dir, 0.0);
        assert_eq!(outcome, MoveOutcome::Moved);
        assert!(!state.move_ready());
        assert_eq!(state.streak(), 1);
        assert_ne!(state.player(), Position::ORIGIN);
        assert!(state.drain_events().contains(&GameEvent::MoveFeedback));

        // Second press before the beat is ignored
        let battery = state.battery();
        assert_eq!(attempt_move(&mut state, Direction::North, 0.0), MoveOutcome::Ignored);
        assert_eq!(state.battery(), battery);

        state.on_beat();
        assert!(state.move_ready());
        assert_eq!(state.streak(), 1);
    }

    #[test]
    fn test_reaching_exit_completes_level() {
        let mut state = running(21);
        let path = state.maze.shortest_path(state.player, state.exit).unwrap();
        let last = path.len() - 1;

        for (i, dir) in path.into_iter().enumerate() {
            let battery = state.battery();
            let outcome = attempt_move(&mut state, dir, 0.0);
            if i == last {
                assert_eq!(
                    outcome,
                    MoveOutcome::LevelComplete {
                        bonus: battery as u64 * 100 + 1000
                    }
                );
            } else {
                assert_eq!(outcome, MoveOutcome::Moved);
                state.on_beat();
            }
        }
        assert_eq!(state.level(), 2);
        assert_eq!(state.player(), Position::ORIGIN);
        assert!(state.move_ready());
        assert_eq!(state.streak(), 0);
    }

    #[test]
    fn test_move_cost_after_level_five() {
        let mut state = running(8);
        state.level = 10;
        state.move_count = 9;
        let dir = open_direction(&state).unwrap();
        let battery = state.battery();
        assert_eq!(attempt_move(&mut state, dir, 0.0), MoveOutcome::Moved);
        assert_eq!(state.battery(), battery - 2);
    }

    #[test]
    fn test_move_cost_starts_at_level_six() {
        // Level 5 tenth move is free
        let mut state = running(8);
        state.level = 5;
        state.move_count = 9;
        let dir = open_direction(&state).unwrap();
        assert_eq!(attempt_move(&mut state, dir, 0.0), MoveOutcome::Moved);
        assert_eq!(state.battery(), 100);

        // Level 6 ninth move is free, tenth costs 6 / 5
        let mut state = running(8);
        state.level = 6;
        state.move_count = 8;
        let dir = open_direction(&state).unwrap();
        assert_eq!(attempt_move(&mut state, dir, 0.0), MoveOutcome::Moved);
        assert_eq!(state.battery(), 100);

        let mut state = running(8);
        state.level = 6;
        state.move_count = 9;
        let dir = open_direction(&state).unwrap();
        assert_eq!(attempt_move(&mut state, dir, 0.0), MoveOutcome::Moved);
        assert_eq!(state.battery(), 99);
    }

    #[test]
    fn test_ignored_when_paused_or_stopped() {
        let mut state = running(8);
        state.pause(10.0);
        assert_eq!(attempt_move(&mut state, Direction::North, 20.0), MoveOutcome::Ignored);
        assert_eq!(state.battery(), 100);

        let mut menu = GameState::new(8);
        assert_eq!(attempt_move(&mut menu, Direction::East, 0.0), MoveOutcome::Ignored);
    }

    #[test]
    fn test_penalty_clamps_at_zero() {
        let mut state = running(8);
        state.battery = 3;
        assert!(attempt_move(&mut state, Direction::North, 0.0).is_failure());
        assert_eq!(state.battery(), 0);
        assert!(state.on_beat().game_over);
    }

    fn dir_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::North),
            Just(Direction::South),
            Just(Direction::East),
            Just(Direction::West),
        ]
    }

    proptest! {
        #[test]
        fn prop_battery_bounded_and_player_in_bounds(
            seed in any::<u64>(),
            steps in prop::collection::vec((dir_strategy(), any::<bool>(), 0u32..400), 1..200),
        ) {
            let mut state = running(seed);
            let mut now = 0.0;
            for (dir, beat, dt) in steps {
                now += dt as f64;
                attempt_move(&mut state, dir, now);
                if beat {
                    state.on_beat();
                }
                state.update_battery_drain(now);
                prop_assert!(state.battery() <= 100);
                let p = state.player();
                prop_assert!(p.x < state.maze().cols() && p.y < state.maze().rows());
                if !state.is_running() {
                    break;
                }
            }
        }

        #[test]
        fn prop_streak_counts_successes(seed in any::<u64>(), dirs in prop::collection::vec(dir_strategy(), 1..100)) {
            let mut state = running(seed);
            let start_level = state.level();
            for dir in dirs {
                let before = state.streak();
                match attempt_move(&mut state, dir, 0.0) {
                    MoveOutcome::Moved => prop_assert_eq!(state.streak(), before + 1),
                    MoveOutcome::OutOfBounds | MoveOutcome::WallHit => prop_assert_eq!(state.streak(), 0),
                    MoveOutcome::LevelComplete { .. } => prop_assert_eq!(state.streak(), 0),
                    MoveOutcome::Ignored => prop_assert_eq!(state.streak(), before),
                }
                // Re-open input without the missed-beat reset
                state.move_ready = true;
                state.moved_this_beat = false;
                if state.level() != start_level {
                    break;
                }
            }
        }
    }
}
