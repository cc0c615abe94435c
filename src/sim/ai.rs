//! Computer opponent
//!
//! Watches the ball and steers its paddle toward a target that is only
//! refreshed after a reaction delay, with a random aiming error.

use rand::Rng;

use super::state::{Ball, Paddle, Side};
use crate::config::{Config, DifficultyProfile};

/// Reaction-delayed paddle controller
#[derive(Debug, Clone)]
pub struct Opponent {
    side: Side,
    /// Time the ball has been approaching since the last resample (ms)
    reaction_timer_ms: f32,
    /// Last sampled ball y (or court centre when idle)
    target_y: f32,
    /// Aiming error added to the target
    error_offset: f32,
}

impl Opponent {
    pub fn new(side: Side, config: &Config) -> Self {
        Self {
            side,
            reaction_timer_ms: 0.0,
            target_y: config.canvas_height / 2.0,
            error_offset: 0.0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    pub fn error_offset(&self) -> f32 {
        self.error_offset
    }

    pub fn reaction_timer_ms(&self) -> f32 {
        self.reaction_timer_ms
    }

    /// Where the paddle centre is heading
    pub fn aim_y(&self) -> f32 {
        self.target_y + self.error_offset
    }

    pub fn reset(&mut self, config: &Config) {
        self.reaction_timer_ms = 0.0;
        self.target_y = config.canvas_height / 2.0;
        self.error_offset = 0.0;
    }

    /// Advance the controller by `dt_ms` and move `paddle`.
    ///
    /// Returns true when the target was resampled this tick.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        paddle: &mut Paddle,
        ball: &Ball,
        profile: &DifficultyProfile,
        config: &Config,
        dt_ms: f32,
        rng: &mut R,
    ) -> bool {
        let approaching = ball.vel.x * self.side.sign() > 0.0;
        let mut resampled = false;

        if approaching {
            self.reaction_timer_ms += dt_ms;
            if self.reaction_timer_ms >= profile.reaction_delay_ms {
                self.reaction_timer_ms = 0.0;
                self.target_y = ball.pos.y;
                self.error_offset = Self::sample_error(profile, rng);
                resampled = true;
            }
        } else {
            // Idle: drift back to the middle
            self.reaction_timer_ms = 0.0;
            self.target_y = config.canvas_height / 2.0;
        }

        self.steer(paddle, profile, config);
        resampled
    }

    fn sample_error<R: Rng + ?Sized>(profile: &DifficultyProfile, rng: &mut R) -> f32 {
        if profile.error_margin <= 0.0 {
            return 0.0;
        }

        let mut offset = rng.random_range(-profile.error_margin..=profile.error_margin);
        if let Some(misdirection) = profile.misdirection {
            if misdirection.range > 0.0 && rng.random_bool(misdirection.chance) {
                offset = rng.random_range(-misdirection.range..=misdirection.range);
                log::trace!("Opponent misdirection: offset {:.1}", offset);
            }
        }
        offset
    }

    /// Full-speed steps while far away, proportional creep when within one step
    fn steer(&self, paddle: &mut Paddle, profile: &DifficultyProfile, config: &Config) {
        let diff = self.aim_y() - paddle.center_y();
        let step = config.paddle_speed * profile.speed_multiplier;

        if diff.abs() > step {
            paddle.move_by(step.copysign(diff), config);
        } else {
            paddle.move_by(diff * config.ai_fine_adjust, config);
        }
    }
}
