//! Read-only view of a match after a tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{GameEvent, MatchState, Phase, Score, Side};
use crate::config::Difficulty;

/// Ball as seen by a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallView {
    pub rect: Rect,
    pub velocity: Vec2,
    pub speed: f32,
    /// Recent centre positions, newest first
    pub trail: Vec<Vec2>,
}

/// Everything produced by one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub phase: Phase,
    /// In the serve cooldown after a point
    pub resetting: bool,
    pub left_paddle: Rect,
    pub right_paddle: Rect,
    pub ball: BallView,
    pub score: Score,
    pub winner: Option<Side>,
    pub difficulty: Difficulty,
    /// Events from this tick, in order
    pub events: Vec<GameEvent>,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState, events: Vec<GameEvent>) -> Self {
        Self {
            phase: state.phase,
            resetting: state.resetting,
            left_paddle: state.left.rect(),
            right_paddle: state.right.rect(),
            ball: BallView {
                rect: state.ball.rect(),
                velocity: state.ball.vel,
                speed: state.ball.speed,
                trail: state.ball.trail.clone(),
            },
            score: state.score,
            winner: state.winner,
            difficulty: state.difficulty,
            events,
        }
    }
}
