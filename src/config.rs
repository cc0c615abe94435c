//! Game configuration and difficulty profiles
//!
//! Everything the simulation reads is supplied here at construction time.
//! Loaded from JSON when a config file is given, otherwise the classic tuning.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration loading/validation failure
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Opponent difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Impossible,
}

impl Difficulty {
    /// All levels in menu order
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Impossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Impossible => "Impossible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "impossible" => Some(Difficulty::Impossible),
            _ => None,
        }
    }

    /// Menu selection by 1-based index (keys 1-4)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=4 => Some(Self::ALL[usize::from(index) - 1]),
            _ => None,
        }
    }
}

/// Occasional deliberate wrong move on resample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Misdirection {
    /// Probability per resample (0-1)
    pub chance: f64,
    /// Offset is drawn from ±range instead of ±error_margin
    pub range: f32,
}

/// Opponent responsiveness and accuracy for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Time the ball must approach before the target is resampled (ms)
    pub reaction_delay_ms: f32,
    /// Resampled targets are off by up to ±this many pixels
    pub error_margin: f32,
    /// Multiplier on the base paddle speed
    pub speed_multiplier: f32,
    #[serde(default)]
    pub misdirection: Option<Misdirection>,
}

impl DifficultyProfile {
    pub const fn new(reaction_delay_ms: f32, error_margin: f32, speed_multiplier: f32) -> Self {
        Self {
            reaction_delay_ms,
            error_margin,
            speed_multiplier,
            misdirection: None,
        }
    }
}

/// One profile per difficulty level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultyProfile,
    pub medium: DifficultyProfile,
    pub hard: DifficultyProfile,
    pub impossible: DifficultyProfile,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile {
                misdirection: Some(Misdirection {
                    chance: 0.15,
                    range: 80.0,
                }),
                ..DifficultyProfile::new(150.0, 50.0, 0.6)
            },
            medium: DifficultyProfile::new(80.0, 25.0, 0.8),
            hard: DifficultyProfile::new(30.0, 10.0, 1.0),
            impossible: DifficultyProfile::new(0.0, 0.0, 1.2),
        }
    }
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::Impossible => &self.impossible,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (Difficulty, &DifficultyProfile)> {
        Difficulty::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

/// Closed-open interval a random value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max)`; a collapsed span always yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// Particle and trail tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Pool capacity, fixed for the life of the game
    pub max_particles: usize,
    /// Added to vertical particle velocity each tick
    pub gravity: f32,
    /// Per-axis velocity multiplier each tick
    pub drag: f32,
    /// Particle size (px)
    pub particle_size: Span,
    /// Added to the requested speed of radial bursts
    pub radial_speed_jitter: Span,
    /// Radial particle lifetime (s)
    pub radial_life_s: Span,
    /// Directional particle speed (px per tick)
    pub directional_speed: Span,
    /// Directional particle lifetime (s)
    pub directional_life_s: Span,
    pub paddle_hit_particles: usize,
    /// Cone width for paddle-hit sparks (degrees)
    pub paddle_hit_spread_deg: f32,
    pub paddle_hit_color: u32,
    pub score_particles: usize,
    pub score_particle_speed: f32,
    pub score_color: u32,
    pub win_particles: usize,
    pub win_color: u32,
    /// Ball positions kept for the motion trail
    pub trail_length: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            max_particles: MAX_PARTICLES,
            gravity: PARTICLE_GRAVITY,
            drag: PARTICLE_DRAG,
            particle_size: Span::new(2.0, 5.0),
            radial_speed_jitter: Span::new(0.0, 2.0),
            radial_life_s: Span::new(0.5, 1.0),
            directional_speed: Span::new(3.0, 7.0),
            directional_life_s: Span::new(0.4, 0.8),
            paddle_hit_particles: 10,
            paddle_hit_spread_deg: 45.0,
            paddle_hit_color: 0x00ffff,
            score_particles: 30,
            score_particle_speed: 3.0,
            score_color: 0xff00ff,
            win_particles: 60,
            win_color: 0xffff00,
            trail_length: BALL_TRAIL_LENGTH,
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per tick
    pub paddle_speed: f32,
    pub paddle_margin: f32,

    // === Ball (speeds in pixels per tick) ===
    pub ball_size: f32,
    pub ball_initial_speed: f32,
    pub ball_speed_increment: f32,
    pub ball_max_speed: f32,
    pub max_bounce_angle_deg: f32,
    pub serve_angle_deg: f32,

    // === Match ===
    pub winning_score: u32,
    pub serve_delay_ms: f32,
    pub max_frame_delta_ms: f32,
    pub starting_difficulty: Difficulty,

    // === Opponent ===
    pub difficulties: DifficultyTable,
    pub ai_fine_adjust: f32,

    // === Effects ===
    pub effects: EffectsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_margin: PADDLE_MARGIN,

            ball_size: BALL_SIZE,
            ball_initial_speed: BALL_INITIAL_SPEED,
            ball_speed_increment: BALL_SPEED_INCREMENT,
            ball_max_speed: BALL_MAX_SPEED,
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,
            serve_angle_deg: SERVE_ANGLE_DEG,

            winning_score: WINNING_SCORE,
            serve_delay_ms: SERVE_DELAY_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            starting_difficulty: Difficulty::Medium,

            difficulties: DifficultyTable::default(),
            ai_fine_adjust: AI_FINE_ADJUST,

            effects: EffectsConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config. Missing fields take classic values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Profile for a difficulty level
    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        self.difficulties.get(difficulty)
    }

    /// Lowest legal paddle top edge is 0, highest is this
    #[inline]
    pub fn paddle_max_y(&self) -> f32 {
        self.canvas_height - self.paddle_height
    }

    /// Paddle top edge that centres it vertically
    #[inline]
    pub fn paddle_center_y(&self) -> f32 {
        self.canvas_height / 2.0 - self.paddle_height / 2.0
    }

    /// Check every value the simulation depends on.
    ///
    /// The resolver is not swept, so the ball's per-tick step must stay below the
    /// thickness it has to cross (paddle face plus ball) or it can tunnel through.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("ball_initial_speed", self.ball_initial_speed),
            ("ball_max_speed", self.ball_max_speed),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("paddle_margin", self.paddle_margin),
            ("ball_speed_increment", self.ball_speed_increment),
            ("max_bounce_angle_deg", self.max_bounce_angle_deg),
            ("serve_angle_deg", self.serve_angle_deg),
            ("serve_delay_ms", self.serve_delay_ms),
            ("ai_fine_adjust", self.ai_fine_adjust),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{name} must be non-negative, got {value}")));
            }
        }

        if self.paddle_height > self.canvas_height {
            return Err(invalid(format!(
                "paddle_height {} exceeds canvas_height {}",
                self.paddle_height, self.canvas_height
            )));
        }
        if 2.0 * (self.paddle_margin + self.paddle_width) >= self.canvas_width {
            return Err(invalid("paddles overlap horizontally".to_string()));
        }
        if self.ball_size >= self.canvas_height {
            return Err(invalid("ball does not fit the canvas".to_string()));
        }
        if self.ball_initial_speed > self.ball_max_speed {
            return Err(invalid(format!(
                "ball_initial_speed {} exceeds ball_max_speed {}",
                self.ball_initial_speed, self.ball_max_speed
            )));
        }
        if self.ball_max_speed >= self.paddle_width + self.ball_size {
            return Err(invalid(format!(
                "ball_max_speed {} allows tunneling (must be below paddle_width + ball_size = {})",
                self.ball_max_speed,
                self.paddle_width + self.ball_size
            )));
        }
        if self.max_bounce_angle_deg >= 90.0 || self.serve_angle_deg >= 90.0 {
            return Err(invalid("launch angles must stay below 90 degrees".to_string()));
        }
        if self.winning_score == 0 {
            return Err(invalid("winning_score must be at least 1".to_string()));
        }
        if self.ai_fine_adjust > 1.0 {
            return Err(invalid("ai_fine_adjust must be within [0, 1]".to_string()));
        }

        for (difficulty, profile) in self.difficulties.iter() {
            let name = difficulty.as_str();
            if !(profile.reaction_delay_ms.is_finite() && profile.reaction_delay_ms >= 0.0) {
                return Err(invalid(format!("{name}: reaction_delay_ms must be non-negative")));
            }
            if !(profile.error_margin.is_finite() && profile.error_margin >= 0.0) {
                return Err(invalid(format!("{name}: error_margin must be non-negative")));
            }
            if !(profile.speed_multiplier.is_finite() && profile.speed_multiplier > 0.0) {
                return Err(invalid(format!("{name}: speed_multiplier must be positive")));
            }
            if let Some(m) = profile.misdirection {
                if !(0.0..=1.0).contains(&m.chance) || !(m.range.is_finite() && m.range >= 0.0) {
                    return Err(invalid(format!("{name}: misdirection out of range")));
                }
            }
        }

        let fx = &self.effects;
        if fx.max_particles == 0 {
            return Err(invalid("effects.max_particles must be at least 1".to_string()));
        }
        if !(fx.drag.is_finite() && (0.0..=1.0).contains(&fx.drag)) || !fx.gravity.is_finite() {
            return Err(invalid("effects.drag must be within [0, 1] and gravity finite".to_string()));
        }
        let spans = [
            ("particle_size", fx.particle_size),
            ("radial_speed_jitter", fx.radial_speed_jitter),
            ("radial_life_s", fx.radial_life_s),
            ("directional_speed", fx.directional_speed),
            ("directional_life_s", fx.directional_life_s),
        ];
        for (name, span) in spans {
            if !span.is_valid() {
                return Err(invalid(format!(
                    "effects.{name} must satisfy 0 <= min <= max, got {}..{}",
                    span.min, span.max
                )));
            }
        }
        // Life drains by dt / lifetime
        if fx.radial_life_s.min <= 0.0 || fx.directional_life_s.min <= 0.0 {
            return Err(invalid("particle lifetimes must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
