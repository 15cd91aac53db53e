//! Lumen Maze entry point
//!
//! The browser build is driven from JS through `platform::web::WebGame`.
//! Natively this runs a headless session on a simulated 60 Hz clock with an
//! autopilot that walks the shortest route, one step per beat.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    log::info!("Lumen Maze (native) starting with seed {}", seed);

    let snapshot = headless::run(seed, 4);
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not encode snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lumen_maze::HighScores;
    use lumen_maze::platform::time::unix_ms;
    use lumen_maze::renderer::{RenderSink, RenderView, TextRenderer};
    use lumen_maze::settings::Settings;
    use lumen_maze::sim::{
        Direction, GameEvent, GameSnapshot, GameState, MoveOutcome, TickInput, attempt_move, tick,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    /// Every this many beats the autopilot bumps a wall on purpose
    const FUMBLE_EVERY: u64 = 13;

    /// Play until `target_level` is reached or the battery runs out
    pub fn run(seed: u64, target_level: u32) -> GameSnapshot {
        let settings = Settings::load();
        let mut state = GameState::with_timing(seed, settings.timing);
        let mut now = 0.0;
        let mut beats = 0u64;

        state.start(now);
        let mut route = plan(&state);

        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            let report = tick(&mut state, &TickInput::default(), now);
            if report.game_over {
                break;
            }
            if !report.beat {
                continue;
            }
            beats += 1;

            if beats % FUMBLE_EVERY == 0 {
                if let Some(dir) = blocked_direction(&state) {
                    let outcome = attempt_move(&mut state, dir, now);
                    log::debug!("Fumbled {:?}: {:?}", dir, outcome);
                }
            }

            let Some(dir) = route.first().copied() else {
                route = plan(&state);
                continue;
            };
            match attempt_move(&mut state, dir, now) {
                MoveOutcome::Moved => {
                    route.remove(0);
                }
                MoveOutcome::LevelComplete { .. } => {
                    route = plan(&state);
                }
                other => {
                    log::warn!("Autopilot move {:?} failed: {:?}", dir, other);
                    route = plan(&state);
                }
            }

            for event in state.drain_events() {
                if let GameEvent::LevelComplete { level, bonus } = event {
                    log::info!("Reached level {} (+{}) after {} beats", level, bonus, beats);
                }
            }
            if state.level() >= target_level {
                break;
            }
        }

        let mut renderer = TextRenderer::default();
        renderer.render(&RenderView::from_state(
            &state,
            now,
            settings.tile_size(state.maze().rows(), state.maze().cols()),
        ));
        println!("{}", renderer.frame);

        let snapshot = state.snapshot();
        let mut scores = HighScores::load();
        match scores.submit("autopilot", snapshot.score, unix_ms()) {
            Ok(Some(rank)) => log::info!("Leaderboard rank {}", rank),
            Ok(None) => log::info!("Score did not place"),
            Err(e) => log::warn!("Score not submitted: {}", e),
        }
        scores.save();

        snapshot
    }

    fn plan(state: &GameState) -> Vec<Direction> {
        state
            .maze()
            .shortest_path(state.player(), state.exit())
            .unwrap_or_default()
    }

    fn blocked_direction(state: &GameState) -> Option<Direction> {
        let cell = state.maze().cell(state.player());
        Direction::ALL.into_iter().find(|&d| !cell.is_open(d))
    }
}
