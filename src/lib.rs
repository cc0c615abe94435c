//! Neon Pong - classic two-paddle Pong against a computer opponent
//!
//! Core modules:
//! - `sim`: Simulation (match state machine, physics, opponent AI, particles)
//! - `config`: Data-driven tuning and difficulty profiles
//! - `game`: Frame driver that feeds deltas into the simulation
//!
//! Drawing, audio and input capture live outside this crate. They consume
//! [`sim::MatchSnapshot`] and the [`sim::GameEvent`] list produced each tick.

pub mod config;
pub mod game;
pub mod sim;

pub use config::{Config, ConfigError, Difficulty, DifficultyProfile};
pub use game::Game;

/// Classic tuning values (used by `Config::default`)
pub mod consts {
    /// Canvas logical dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Pixels per tick
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from the side edge
    pub const PADDLE_MARGIN: f32 = 20.0;

    /// Ball defaults (speeds are pixels per tick)
    pub const BALL_SIZE: f32 = 15.0;
    pub const BALL_INITIAL_SPEED: f32 = 5.0;
    pub const BALL_SPEED_INCREMENT: f32 = 0.5;
    pub const BALL_MAX_SPEED: f32 = 15.0;

    /// Paddle edge hits leave at this angle (degrees)
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
    /// Serves launch within ± this angle of horizontal (degrees)
    pub const SERVE_ANGLE_DEG: f32 = 30.0;

    /// First to this many points wins
    pub const WINNING_SCORE: u32 = 11;
    /// Delay after a point before the next serve (ms)
    pub const SERVE_DELAY_MS: f32 = 1000.0;
    /// Longest frame delta the driver will accept (ms)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Opponent fine adjustment: fraction of remaining distance per tick
    pub const AI_FINE_ADJUST: f32 = 0.1;

    /// Particle defaults
    pub const MAX_PARTICLES: usize = 150;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_DRAG: f32 = 0.98;
    pub const BALL_TRAIL_LENGTH: usize = 10;
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics; when `min > max` the result is `max`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(4.0, 0.0, 10.0), 4.0);
        // Inverted band collapses to max instead of panicking
        assert_eq!(clamp(4.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_angle_conversion() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((rad_to_deg(std::f32::consts::FRAC_PI_2) - 90.0).abs() < 1e-4);
        assert!((rad_to_deg(deg_to_rad(-60.0)) + 60.0).abs() < 1e-4);
    }
}
