//! Match state and core simulation types
//!
//! `MatchState` exclusively owns the paddles, the ball and the score. The
//! opponent controller lives here too but only ever writes its own paddle.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::Opponent;
use super::collision;
use super::rect::Rect;
use crate::clamp;
use crate::config::{Config, ConfigError, Difficulty, DifficultyProfile};

/// Side of the court. The human plays Left, the opponent Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of horizontal velocity heading toward this side
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Difficulty selection, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Someone reached the winning score
    GameOver,
}

/// A paddle. `x` never changes; `y` is the top edge and always stays on the court.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    pub fn new(side: Side, config: &Config) -> Self {
        let x = match side {
            Side::Left => config.paddle_margin,
            Side::Right => config.canvas_width - config.paddle_margin - config.paddle_width,
        };
        Self {
            side,
            x,
            y: config.paddle_center_y(),
            width: config.paddle_width,
            height: config.paddle_height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Set the top edge, clamped to `[0, canvas_height - height]`
    pub fn set_y(&mut self, y: f32, config: &Config) {
        self.y = clamp(y, 0.0, config.paddle_max_y());
    }

    /// Place the paddle so its centre sits at `center_y` (clamped)
    pub fn set_center_y(&mut self, center_y: f32, config: &Config) {
        self.set_y(center_y - self.height / 2.0, config);
    }

    pub fn move_by(&mut self, dy: f32, config: &Config) {
        self.set_y(self.y + dy, config);
    }

    pub fn recenter(&mut self, config: &Config) {
        self.y = config.paddle_center_y();
    }

    /// The x coordinate of the face the ball bounces off
    pub fn face_x(&self) -> f32 {
        match self.side {
            Side::Left => self.x + self.width,
            Side::Right => self.x,
        }
    }
}

/// The ball. Velocity is a fixed per-tick step, not scaled by frame time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Centre position
    pub pos: Vec2,
    /// Position at the start of the current tick (for the approach gate)
    pub prev_pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Nominal speed; `vel` has this magnitude after every serve and paddle bounce
    pub speed: f32,
    pub size: f32,
    /// Recent positions, newest first
    #[serde(default)]
    pub trail: Vec<Vec2>,
}

impl Ball {
    /// Ball at rest in the centre of the court
    pub fn new(config: &Config) -> Self {
        let center = court_center(config);
        Self {
            pos: center,
            prev_pos: center,
            vel: Vec2::ZERO,
            speed: config.ball_initial_speed,
            size: config.ball_size,
            trail: Vec::with_capacity(config.effects.trail_length),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn prev_rect(&self) -> Rect {
        Rect::centered(self.prev_pos, self.size)
    }

    /// Move back to the centre and stop
    pub fn recenter(&mut self, config: &Config) {
        self.pos = court_center(config);
        self.prev_pos = self.pos;
        self.vel = Vec2::ZERO;
        self.speed = config.ball_initial_speed;
        self.clear_trail();
    }

    /// Record current position to trail (call each tick while in play)
    pub fn record_trail(&mut self, max_len: usize) {
        if max_len == 0 {
            return;
        }
        self.trail.insert(0, self.pos);
        self.trail.truncate(max_len);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

fn court_center(config: &Config) -> Vec2 {
    Vec2::new(config.canvas_width / 2.0, config.canvas_height / 2.0)
}

/// Points per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Award a point, returning the new total for that side
    pub fn award(&mut self, side: Side) -> u32 {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot += 1;
        *slot
    }
}

/// Discrete notifications emitted during a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    DifficultyChanged(Difficulty),
    /// Ball launched from the centre toward `toward`
    Serve { toward: Side },
    /// Ball bounced off the paddle on `side`; `x, y` is the contact point
    PaddleHit { side: Side, x: f32, y: f32, speed: f32 },
    /// Ball bounced off the top or bottom wall
    WallBounce { x: f32, y: f32 },
    /// `side` scored; ball left the court at `x, y`
    PointScored { side: Side, x: f32, y: f32, score: Score },
    MatchWon { side: Side },
}

/// Complete match state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct MatchState {
    config: Config,
    /// Current phase
    pub phase: Phase,
    /// Human paddle
    pub left: Paddle,
    /// Opponent paddle
    pub right: Paddle,
    pub ball: Ball,
    pub score: Score,
    /// Set when the match ends
    pub winner: Option<Side>,
    pub difficulty: Difficulty,
    pub opponent: Opponent,
    /// Serve cooldown after a point
    pub resetting: bool,
    pub reset_timer_ms: f32,
    /// Side the most recent serve went toward; flips before every serve
    pub serve_direction: Side,
    /// Simulation tick counter
    pub time_ticks: u64,
    seed: u64,
    rng: Pcg32,
}

impl MatchState {
    /// Create a match sitting in the menu
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let difficulty = config.starting_difficulty;
        Ok(Self {
            phase: Phase::Menu,
            left: Paddle::new(Side::Left, &config),
            right: Paddle::new(Side::Right, &config),
            ball: Ball::new(&config),
            score: Score::default(),
            winner: None,
            difficulty,
            opponent: Opponent::new(Side::Right, &config),
            resetting: false,
            reset_timer_ms: 0.0,
            // First serve flips this, so the human receives it
            serve_direction: Side::Right,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Profile of the active difficulty
    pub fn profile(&self) -> &DifficultyProfile {
        self.config.profile(self.difficulty)
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Select difficulty by menu index (1-4). Unknown indices keep the current one.
    pub fn select_difficulty(&mut self, index: u8) -> Option<Difficulty> {
        match Difficulty::from_index(index) {
            Some(difficulty) => {
                self.difficulty = difficulty;
                log::info!("Difficulty set to {}", difficulty.as_str());
                Some(difficulty)
            }
            None => {
                log::warn!(
                    "Ignoring invalid difficulty selection {}, keeping {}",
                    index,
                    self.difficulty.as_str()
                );
                None
            }
        }
    }

    /// Zero scores and centre everything, ball at rest. Serve parity is kept.
    pub fn reset_to_menu(&mut self) {
        self.score = Score::default();
        self.winner = None;
        self.resetting = false;
        self.reset_timer_ms = 0.0;
        self.left.recenter(&self.config);
        self.right.recenter(&self.config);
        self.ball.recenter(&self.config);
        self.opponent.reset(&self.config);
    }

    /// Full reset for a new match, then serve
    pub fn reset_match(&mut self) -> Side {
        self.reset_to_menu();
        self.serve()
    }

    /// Re-launch the ball from the centre at the initial speed and a small
    /// random angle. Direction alternates every serve regardless of who scored.
    pub fn serve(&mut self) -> Side {
        self.serve_direction = self.serve_direction.opposite();
        self.ball.recenter(&self.config);
        let angle = collision::random_serve_angle(self.config.serve_angle_deg, &mut self.rng);
        collision::launch(
            &mut self.ball,
            angle,
            self.serve_direction,
            self.config.ball_initial_speed,
        );
        log::debug!(
            "Serve toward {:?} at {:.1} deg",
            self.serve_direction,
            angle
        );
        self.serve_direction
    }

    /// Split borrows for the opponent update
    pub(crate) fn opponent_parts(
        &mut self,
    ) -> (
        &mut Opponent,
        &mut Paddle,
        &Ball,
        &DifficultyProfile,
        &Config,
        &mut Pcg32,
    ) {
        let paddle = match self.opponent.side() {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        (
            &mut self.opponent,
            paddle,
            &self.ball,
            self.config.profile(self.difficulty),
            &self.config,
            &mut self.rng,
        )
    }

    /// Split borrows for the human paddle and ball
    pub(crate) fn player_parts(&mut self) -> (&mut Paddle, &Config) {
        let paddle = match self.opponent.side() {
            Side::Left => &mut self.right,
            Side::Right => &mut self.left,
        };
        (paddle, &self.config)
    }

    /// Split borrows for the physics step
    pub(crate) fn physics_parts(&mut self) -> (&mut Ball, &Paddle, &Paddle, &Config) {
        (&mut self.ball, &self.left, &self.right, &self.config)
    }
}
