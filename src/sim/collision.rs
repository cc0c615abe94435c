//! Collision detection and response
//!
//! Discrete (not swept) checks against the walls and the two paddles. Tunneling
//! is ruled out by `Config::validate`, which keeps the maximum per-tick step
//! below the paddle face plus ball thickness.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Paddle, Side};
use crate::config::Config;
use crate::deg_to_rad;

/// Horizontal walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Bottom,
}

/// Result of a paddle bounce
#[derive(Debug, Clone, Copy)]
pub struct Bounce {
    /// Outgoing angle from horizontal (degrees)
    pub angle_deg: f32,
    /// New ball speed
    pub speed: f32,
    /// Where the ball met the paddle face
    pub contact: Vec2,
}

/// Advance the ball one tick. Velocity is per tick; frame time is ignored.
#[inline]
pub fn integrate(ball: &mut Ball) {
    ball.prev_pos = ball.pos;
    ball.pos += ball.vel;
}

/// Clamp the ball inside the top/bottom walls and reflect its vertical velocity.
///
/// Perfectly elastic: speed is unchanged.
pub fn reflect_walls(ball: &mut Ball, canvas_height: f32) -> Option<Wall> {
    let half = ball.size / 2.0;
    if ball.pos.y - half <= 0.0 {
        ball.pos.y = half;
        ball.vel.y = ball.vel.y.abs();
        Some(Wall::Top)
    } else if ball.pos.y + half >= canvas_height {
        ball.pos.y = canvas_height - half;
        ball.vel.y = -ball.vel.y.abs();
        Some(Wall::Bottom)
    } else {
        None
    }
}

/// Whether the ball hits `paddle` this tick.
///
/// Besides overlapping, the ball must be heading toward the paddle and must have
/// started the tick fully on the court side of the paddle face. A ball still
/// overlapping after a bounce, or one that slipped behind the face, never
/// registers again until it comes back around.
pub fn paddle_hit(ball: &Ball, paddle: &Paddle) -> bool {
    let approaching = ball.vel.x * paddle.side.sign() > 0.0;
    if !approaching {
        return false;
    }

    let prev = ball.prev_rect();
    let was_outside = match paddle.side {
        Side::Left => prev.left() >= paddle.face_x(),
        Side::Right => prev.right() <= paddle.face_x(),
    };

    was_outside && ball.rect().overlaps(&paddle.rect())
}

/// Where the ball struck the paddle: -1 top edge, 0 centre, +1 bottom edge
pub fn hit_position(ball_y: f32, paddle: &Paddle) -> f32 {
    ((ball_y - paddle.center_y()) / (paddle.height / 2.0)).clamp(-1.0, 1.0)
}

/// Linear map of hit position onto `[-max_angle, +max_angle]`
#[inline]
pub fn bounce_angle_deg(hit_position: f32, max_angle_deg: f32) -> f32 {
    hit_position * max_angle_deg
}

/// Bounce the ball off `paddle`: new angle from the hit position, speed ramped
/// by one increment (capped), and the ball pushed clear of the face.
pub fn bounce(ball: &mut Ball, paddle: &Paddle, config: &Config) -> Bounce {
    let angle_deg = bounce_angle_deg(hit_position(ball.pos.y, paddle), config.max_bounce_angle_deg);
    ball.speed = (ball.speed + config.ball_speed_increment).min(config.ball_max_speed);

    // Ball leaves toward the opposite side
    let outgoing = paddle.side.opposite();
    launch(ball, angle_deg, outgoing, ball.speed);

    let face = paddle.face_x();
    let contact = Vec2::new(face, ball.pos.y);
    let half = ball.size / 2.0;
    ball.pos.x = face + outgoing.sign() * (half + 1.0);

    Bounce {
        angle_deg,
        speed: ball.speed,
        contact,
    }
}

/// Set velocity from speed and angle, heading toward `toward`
pub fn launch(ball: &mut Ball, angle_deg: f32, toward: Side, speed: f32) {
    let rad = deg_to_rad(angle_deg);
    ball.speed = speed;
    ball.vel = Vec2::new(rad.cos() * speed * toward.sign(), rad.sin() * speed);
}

/// Uniform angle in `[-max, max]` degrees
pub fn random_serve_angle<R: Rng + ?Sized>(max_deg: f32, rng: &mut R) -> f32 {
    if max_deg > 0.0 {
        rng.random_range(-max_deg..=max_deg)
    } else {
        0.0
    }
}

/// Side that scores if the ball has left the court
pub fn scoring_side(ball: &Ball, canvas_width: f32) -> Option<Side> {
    let half = ball.size / 2.0;
    if ball.pos.x - half <= 0.0 {
        Some(Side::Right)
    } else if ball.pos.x + half >= canvas_width {
        Some(Side::Left)
    } else {
        None
    }
}
