//! Neon Pong headless driver
//!
//! Runs an attract-mode match (computer vs computer) at a fixed 60 Hz frame
//! rate and logs what happens. Useful for tuning configs without a renderer.
//!
//! Run with `--help` for options.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use neon_pong::{
    Config, Difficulty, DifficultyProfile, Game,
    sim::{GameEvent, Opponent, Paddle, Phase, Side, TickInput},
};
#[cfg(not(target_arch = "wasm32"))]
use rand::SeedableRng;
#[cfg(not(target_arch = "wasm32"))]
use rand_pcg::Pcg32;

/// Frame interval for the simulated display (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Give up on matches that never finish (one hour of frames)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 60 * 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "neon-pong")]
#[command(about = "Run a headless computer-vs-computer Pong match", long_about = None)]
struct Args {
    /// JSON config file (missing fields take classic values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Opponent difficulty: easy, medium, hard or impossible
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty: {s}"))
}

/// Stands in for the human: a second opponent controller steering a shadow
/// paddle, fed to the match as a pointer target.
#[cfg(not(target_arch = "wasm32"))]
struct Autopilot {
    opponent: Opponent,
    paddle: Paddle,
    profile: DifficultyProfile,
    rng: Pcg32,
}

#[cfg(not(target_arch = "wasm32"))]
impl Autopilot {
    fn new(config: &Config, difficulty: Difficulty, seed: u64) -> Self {
        Self {
            opponent: Opponent::new(Side::Left, config),
            paddle: Paddle::new(Side::Left, config),
            profile: *config.profile(difficulty),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn input(&mut self, game: &Game, dt_ms: f32) -> TickInput {
        let state = game.state();
        self.paddle.y = state.left.y;
        self.opponent.update(
            &mut self.paddle,
            &state.ball,
            &self.profile,
            state.config(),
            dt_ms,
            &mut self.rng,
        );
        TickInput {
            target_y: Some(self.paddle.center_y()),
            ..Default::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let difficulty = args.difficulty.unwrap_or(config.starting_difficulty);
    let autopilot = Autopilot::new(&config, difficulty, seed.wrapping_add(1));

    let mut game = match Game::new(config, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Neon Pong (headless) starting: {} opponent", difficulty.as_str());
    run(&mut game, autopilot, difficulty, args.json)
}

#[cfg(not(target_arch = "wasm32"))]
fn run(game: &mut Game, mut autopilot: Autopilot, difficulty: Difficulty, json: bool) -> ExitCode {
    let menu_index = Difficulty::ALL
        .iter()
        .position(|d| *d == difficulty)
        .and_then(|i| u8::try_from(i + 1).ok());

    let start = TickInput {
        start: true,
        select_difficulty: menu_index,
        ..Default::default()
    };
    let mut timestamp = 0.0;
    let mut snapshot = game.frame(timestamp, &start);
    let mut rallies = 0u32;
    let mut longest_rally = 0u32;
    let mut hits = 0u32;

    for _ in 0..MAX_FRAMES {
        if snapshot.phase == Phase::GameOver {
            break;
        }
        timestamp += FRAME_MS;
        let input = autopilot.input(game, FRAME_MS as f32);
        snapshot = game.frame(timestamp, &input);

        for event in &snapshot.events {
            match event {
                GameEvent::PaddleHit { side, speed, .. } => {
                    hits += 1;
                    log::debug!("{side:?} hit, speed {speed:.1}");
                }
                GameEvent::PointScored { side, score, .. } => {
                    rallies += 1;
                    longest_rally = longest_rally.max(hits);
                    hits = 0;
                    log::info!("Point {side:?}: {} - {}", score.left, score.right);
                }
                GameEvent::MatchWon { side } => log::info!("{side:?} wins"),
                other => log::trace!("{other:?}"),
            }
        }
    }

    if snapshot.phase != Phase::GameOver {
        log::warn!("Match did not finish within {MAX_FRAMES} frames");
    }

    println!(
        "final score {} - {} after {} points (longest rally {} hits, {:.0}s simulated)",
        snapshot.score.left,
        snapshot.score.right,
        rallies,
        longest_rally,
        timestamp / 1000.0
    );

    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                log::error!("Snapshot serialization failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds embed the library; there is no standalone entry point
}
