//! Fixed timestep simulation tick
//!
//! Phase transitions, command dispatch and the per-tick update order:
//! duck release -> character physics -> obstacles -> clouds -> score -> collision.

use rand::Rng;

use super::collision::find_collision;
use super::spawner::update_obstacles;
use super::state::{CharacterMode, Cloud, GamePhase, GameState};

/// Discrete player commands, independent of the device that produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a run from the menu / game over screen, jump while playing
    Start,
    Jump,
    DuckHold,
    DuckRelease,
}

/// Held-input snapshot read at the start of a tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub duck_held: bool,
}

/// Things that happened during a command or tick, for collaborators to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RunStarted { run: u32 },
    Jumped,
    /// Floored score crossed a cue interval
    ScoreMilestone { score: u64 },
    /// Character collided; the run is over
    Hit { score: u64 },
    /// The finished run beat the stored high score
    NewHighScore { score: u64 },
}

/// Apply a command immediately. Commands that make no sense in the current
/// phase are ignored.
pub fn handle_command(state: &mut GameState, command: Command) -> Option<GameEvent> {
    match (state.phase, command) {
        (GamePhase::Menu | GamePhase::GameOver, Command::Start) => {
            state.start_run();
            log::info!("Run {} started (seed {})", state.run, state.seed);
            Some(GameEvent::RunStarted { run: state.run })
        }
        (GamePhase::Playing, Command::Start | Command::Jump) => state
            .character
            .try_jump(&state.config.character)
            .then_some(GameEvent::Jumped),
        (GamePhase::Playing, Command::DuckHold) => {
            state.character.try_duck(&state.config.character);
            None
        }
        _ => None,
    }
}

/// Advance the game state by one fixed timestep of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }
    debug_assert!(state.speed > 0.0, "speed must stay positive");

    state.ticks += 1;

    // Character
    if !input.duck_held && state.character.mode == CharacterMode::Ducking {
        state.character.set_mode(CharacterMode::Running);
    }
    state.character.apply_physics(&state.config.character);
    state
        .character
        .advance_animation(dt_ms, &state.config.character);
    debug_assert!(state.character.y <= state.config.character.ground_y);
    debug_assert!(state.character.vy <= state.config.character.max_fall_speed);

    update_obstacles(state);
    update_clouds(state);
    update_score(state, &mut events);

    if let Some(index) = find_collision(&state.character, &state.obstacles, &state.config) {
        game_over(state, index, &mut events);
    }

    events
}

/// Drift clouds left, recycling them past the right edge
fn update_clouds(state: &mut GameState) {
    let GameState {
        clouds,
        cloud_rng,
        config,
        ..
    } = state;

    for cloud in clouds.iter_mut() {
        cloud.pos.x -= cloud.speed;
        if cloud.pos.x + config.clouds.width < 0.0 {
            let x = config.field.width + cloud_rng.random::<f32>() * config.clouds.respawn_spread;
            *cloud = Cloud::random(cloud_rng, x, &config.clouds);
        }
    }
}

/// True when going from `before` to `after` passes a multiple of `interval`
fn crossed_multiple(before: u64, after: u64, interval: u64) -> bool {
    after / interval > before / interval
}

/// Score accrual, speed ramp and ground scroll
fn update_score(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let before = state.score_floor();
    state.score_units += state.score_step_units();
    let after = state.score_floor();

    let difficulty = &state.config.difficulty;
    if crossed_multiple(before, after, difficulty.speed_interval) {
        state.speed = (state.speed + difficulty.speed_increase).min(difficulty.max_speed);
        log::debug!("Speed up to {:.2} at score {}", state.speed, after);
    }
    if crossed_multiple(before, after, difficulty.score_cue_interval) {
        events.push(GameEvent::ScoreMilestone { score: after });
    }

    state.ground_offset -= state.speed;
    if state.ground_offset <= -state.config.field.ground_wrap {
        state.ground_offset = 0.0;
    }
}

fn game_over(state: &mut GameState, obstacle_index: usize, events: &mut Vec<GameEvent>) {
    let score = state.score_floor();
    log::info!(
        "Run {} over: hit {:?} at score {} after {} ticks",
        state.run,
        state.obstacles[obstacle_index].kind,
        score,
        state.ticks
    );
    events.push(GameEvent::Hit { score });
    finish_run(state, events);
}

/// Close the current run without a collision (session ending mid-run).
/// The score still counts toward the high score; no hit is reported.
pub fn end_run(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }
    log::info!(
        "Run {} ended at score {} after {} ticks",
        state.run,
        state.score_floor(),
        state.ticks
    );
    finish_run(state, &mut events);
    events
}

/// Freeze the run in game over and settle the high score
fn finish_run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::GameOver;
    state.character.set_mode(CharacterMode::Dead);

    let score = state.score_floor();
    if score > state.high_score {
        state.high_score = score;
        events.push(GameEvent::NewHighScore { score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::sim::config::RunnerConfig;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use proptest::prelude::*;

    /// Config with the spawner effectively disabled
    fn quiet_config() -> RunnerConfig {
        let mut config = RunnerConfig::default();
        config.obstacles.min_gap = 1.0e9;
        config.obstacles.max_gap = 1.0e9;
        config
    }

    fn playing(config: RunnerConfig) -> GameState {
        let mut state = GameState::new(config, 12345, 0);
        handle_command(&mut state, Command::Start);
        state
    }

    fn run_ticks(state: &mut GameState, n: usize) -> Vec<GameEvent> {
        let input = TickInput::default();
        (0..n)
            .flat_map(|_| tick(state, &input, TICK_MS))
            .collect()
    }

    /// Place a large cactus right on top of the character
    fn force_collision(state: &mut GameState) {
        let cactus = Obstacle::new(ObstacleKind::CactusLarge, 60.0, &state.config);
        state.obstacles.push(cactus);
    }

    #[test]
    fn test_menu_ignores_ticks_until_start() {
        let mut state = GameState::new(RunnerConfig::default(), 1, 0);
        assert!(run_ticks(&mut state, 10).is_empty());
        assert_eq!(state.score_units, 0);
        assert_eq!(state.ticks, 0);

        let event = handle_command(&mut state, Command::Start);
        assert_eq!(event, Some(GameEvent::RunStarted { run: 1 }));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.speed, 3.0);
        assert_eq!(state.distance_to_next_spawn, 400.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_jump_command_applies_before_next_tick() {
        let mut state = playing(quiet_config());
        assert_eq!(handle_command(&mut state, Command::Jump), Some(GameEvent::Jumped));
        assert_eq!(state.character.mode, CharacterMode::Jumping);
        assert_eq!(state.character.vy, state.config.character.jump_impulse);
    }

    #[test]
    fn test_start_while_playing_jumps() {
        let mut state = playing(quiet_config());
        assert_eq!(handle_command(&mut state, Command::Start), Some(GameEvent::Jumped));
        assert_eq!(state.run, 1);
    }

    #[test]
    fn test_no_stacked_jumps() {
        let mut state = playing(quiet_config());
        handle_command(&mut state, Command::Jump);
        run_ticks(&mut state, 3);
        let vy = state.character.vy;
        assert_eq!(handle_command(&mut state, Command::Start), None);
        assert_eq!(handle_command(&mut state, Command::Jump), None);
        assert_eq!(state.character.vy, vy);
    }

    #[test]
    fn test_duck_ignored_outside_playing() {
        let mut state = GameState::new(quiet_config(), 1, 0);
        assert_eq!(handle_command(&mut state, Command::DuckHold), None);
        assert_eq!(state.character.mode, CharacterMode::Running);
        assert_eq!(handle_command(&mut state, Command::Jump), None);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_duck_held_then_released() {
        let mut state = playing(quiet_config());
        handle_command(&mut state, Command::DuckHold);
        assert_eq!(state.character.mode, CharacterMode::Ducking);

        tick(&mut state, &TickInput { duck_held: true }, TICK_MS);
        assert_eq!(state.character.mode, CharacterMode::Ducking);

        tick(&mut state, &TickInput { duck_held: false }, TICK_MS);
        assert_eq!(state.character.mode, CharacterMode::Running);
    }

    #[test]
    fn test_score_and_speed_after_1500_ticks() {
        let mut state = playing(quiet_config());
        run_ticks(&mut state, 1500);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score(), 150.0);
        assert!((state.speed - 3.05).abs() < 1e-5, "speed = {}", state.speed);

        // No second ramp until the next multiple
        run_ticks(&mut state, 1499);
        assert!((state.speed - 3.05).abs() < 1e-5);
        run_ticks(&mut state, 1);
        assert!((state.speed - 3.10).abs() < 1e-5);
    }

    #[test]
    fn test_speed_is_capped() {
        let mut state = playing(quiet_config());
        state.speed = state.config.difficulty.max_speed - 0.01;
        state.score_units = 149_900;
        run_ticks(&mut state, 1);
        assert_eq!(state.speed, state.config.difficulty.max_speed);
    }

    #[test]
    fn test_score_milestone_event() {
        let mut state = playing(quiet_config());
        state.score_units = 99_900;
        let events = run_ticks(&mut state, 1);
        assert_eq!(events, vec![GameEvent::ScoreMilestone { score: 100 }]);
        assert!(run_ticks(&mut state, 5).is_empty());
    }

    #[test]
    fn test_ground_offset_wraps() {
        let mut state = playing(quiet_config());
        run_ticks(&mut state, 7);
        assert_eq!(state.ground_offset, -21.0);
        run_ticks(&mut state, 1);
        assert_eq!(state.ground_offset, 0.0);
    }

    #[test]
    fn test_obstacle_scrolls_and_is_pruned_when_fully_off_screen() {
        let mut state = playing(quiet_config());
        let bird = Obstacle::new(ObstacleKind::BirdHigh, state.config.field.width, &state.config);
        let width = bird.size.x;
        state.obstacles.push(bird);

        run_ticks(&mut state, 100);
        assert_eq!(state.obstacles[0].pos.x, 800.0 - 100.0 * 3.0);

        run_ticks(&mut state, 179);
        assert_eq!(state.obstacles.len(), 1);
        let x = state.obstacles[0].pos.x;
        assert_eq!(x, 800.0 - 279.0 * 3.0);
        assert!(x + width > 0.0);

        run_ticks(&mut state, 1);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_collision_ends_run_and_freezes_score() {
        let mut state = playing(quiet_config());
        run_ticks(&mut state, 50);
        force_collision(&mut state);
        let events = run_ticks(&mut state, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.character.mode, CharacterMode::Dead);
        assert!(events.contains(&GameEvent::Hit { score: 5 }));

        let frozen = state.score_units;
        let x = state.obstacles[0].pos.x;
        assert!(run_ticks(&mut state, 20).is_empty());
        assert_eq!(state.score_units, frozen);
        assert_eq!(state.obstacles[0].pos.x, x);

        // Commands other than Start are ignored
        assert_eq!(handle_command(&mut state, Command::Jump), None);
        assert_eq!(handle_command(&mut state, Command::DuckHold), None);
        assert_eq!(state.character.mode, CharacterMode::Dead);
    }

    #[test]
    fn test_restart_after_game_over_resets_run() {
        let mut state = playing(RunnerConfig::default());
        run_ticks(&mut state, 300);
        state.speed = 7.5;
        force_collision(&mut state);
        run_ticks(&mut state, 1);
        assert_eq!(state.phase, GamePhase::GameOver);

        assert_eq!(
            handle_command(&mut state, Command::Start),
            Some(GameEvent::RunStarted { run: 2 })
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score(), 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.speed, 3.0);
        assert_eq!(state.ground_offset, 0.0);
        assert_eq!(state.character.mode, CharacterMode::Running);
        assert_eq!(state.character.y, state.config.character.ground_y);
        assert_eq!(state.distance_to_next_spawn, 400.0);
    }

    #[test]
    fn test_high_score_only_when_improved() {
        let mut state = GameState::new(quiet_config(), 5, 500);
        handle_command(&mut state, Command::Start);
        state.score_units = 742_000;
        force_collision(&mut state);
        let events = run_ticks(&mut state, 1);
        assert!(events.contains(&GameEvent::NewHighScore { score: 742 }));
        assert_eq!(state.high_score, 742);

        handle_command(&mut state, Command::Start);
        state.score_units = 300_000;
        force_collision(&mut state);
        let events = run_ticks(&mut state, 1);
        assert!(events.contains(&GameEvent::Hit { score: 300 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewHighScore { .. })));
        assert_eq!(state.high_score, 742);
    }

    #[test]
    fn test_clouds_only_move_while_playing() {
        let mut state = GameState::new(RunnerConfig::default(), 3, 0);
        let before = state.clouds.clone();
        run_ticks(&mut state, 10);
        assert_eq!(state.clouds, before);

        handle_command(&mut state, Command::Start);
        run_ticks(&mut state, 1);
        for (old, new) in before.iter().zip(&state.clouds) {
            assert!(new.pos.x < old.pos.x);
        }
    }

    #[test]
    fn test_clouds_recycle_past_right_edge() {
        let mut state = playing(quiet_config());
        state.clouds[0].pos.x = -45.5;
        state.clouds[0].speed = 1.0;
        run_ticks(&mut state, 1);
        let cloud = &state.clouds[0];
        assert!(cloud.pos.x >= 800.0 && cloud.pos.x < 1000.0);
        assert!((20.0..80.0).contains(&cloud.pos.y));
        let clouds = &state.config.clouds;
        assert!(cloud.speed >= clouds.min_speed);
        assert!(cloud.speed <= clouds.min_speed + clouds.speed_range);
    }

    #[test]
    fn test_end_run_records_high_score_without_hit() {
        let mut state = playing(quiet_config());
        state.high_score = 10;
        run_ticks(&mut state, 150);
        let events = end_run(&mut state);
        assert_eq!(events, vec![GameEvent::NewHighScore { score: 15 }]);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.character.mode, CharacterMode::Dead);
        assert_eq!(state.high_score, 15);

        // Nothing left to end
        assert!(end_run(&mut state).is_empty());
    }

    #[test]
    fn test_end_run_below_high_score_is_quiet() {
        let mut state = playing(quiet_config());
        state.high_score = 500;
        run_ticks(&mut state, 30);
        assert!(end_run(&mut state).is_empty());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 500);

        let mut menu = GameState::new(quiet_config(), 1, 0);
        assert!(end_run(&mut menu).is_empty());
        assert_eq!(menu.phase, GamePhase::Menu);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(RunnerConfig::default());
        let mut b = playing(RunnerConfig::default());
        for i in 0..2000 {
            if i % 97 == 0 {
                handle_command(&mut a, Command::Jump);
                handle_command(&mut b, Command::Jump);
            }
            let ea = tick(&mut a, &TickInput::default(), TICK_MS);
            let eb = tick(&mut b, &TickInput::default(), TICK_MS);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.clouds, b.clouds);
        assert_eq!(a.score_units, b.score_units);
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Command(Command),
        Tick,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            1 => Just(Step::Command(Command::Start)),
            1 => Just(Step::Command(Command::Jump)),
            1 => Just(Step::Command(Command::DuckHold)),
            1 => Just(Step::Command(Command::DuckRelease)),
            8 => Just(Step::Tick),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_for_any_input(
            seed in any::<u64>(),
            steps in prop::collection::vec(step_strategy(), 1..600),
        ) {
            let mut state = GameState::new(RunnerConfig::default(), seed, 0);
            let mut duck_held = false;
            let ground_y = state.config.character.ground_y;
            let max_fall = state.config.character.max_fall_speed;

            for step in steps {
                match step {
                    Step::Command(command) => {
                        match command {
                            Command::DuckHold => duck_held = true,
                            Command::DuckRelease => duck_held = false,
                            _ => {}
                        }
                        handle_command(&mut state, command);
                    }
                    Step::Tick => {
                        let phase = state.phase;
                        let score = state.score_units;
                        tick(&mut state, &TickInput { duck_held }, TICK_MS);
                        if phase == GamePhase::Playing {
                            prop_assert!(state.score_units >= score);
                        } else {
                            prop_assert_eq!(state.score_units, score);
                        }
                    }
                }
                prop_assert!(state.character.y <= ground_y);
                prop_assert!(state.character.vy <= max_fall);
                prop_assert!(state.speed > 0.0);
                prop_assert!(state.speed <= state.config.difficulty.max_speed);
                prop_assert!(state.ground_offset <= 0.0);
                prop_assert!(state.ground_offset > -state.config.field.ground_wrap);
            }
        }
    }
}
