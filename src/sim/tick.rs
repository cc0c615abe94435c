//! Per-tick match update
//!
//! Fixed order inside a tick: input translation, opponent, ball integration,
//! wall and paddle collisions, scoring. Later stages always see positions
//! already updated this tick.

use super::collision;
use super::state::{GameEvent, MatchState, Phase, Side};

/// Input intents for a single tick. `Default` means "nothing pressed".
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move human paddle up
    pub up: bool,
    /// Move human paddle down
    pub down: bool,
    /// Absolute paddle centre from pointer/touch; overrides up/down
    pub target_y: Option<f32>,
    /// Start a match from the menu, or acknowledge game over
    pub start: bool,
    /// Pause/resume toggle
    pub pause: bool,
    /// Difficulty menu index (1-4), only honoured in the menu
    pub select_difficulty: Option<u8>,
}

/// Advance the match by one tick of `dt_ms` milliseconds.
///
/// Returns the events produced, in order. Never fails: bad input is ignored.
pub fn tick(state: &mut MatchState, input: &TickInput, dt_ms: f32) -> Vec<GameEvent> {
    let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
    let mut events = Vec::new();

    match state.phase {
        Phase::Menu => {
            if let Some(index) = input.select_difficulty {
                if let Some(difficulty) = state.select_difficulty(index) {
                    events.push(GameEvent::DifficultyChanged(difficulty));
                }
            }
            if input.start {
                set_phase(state, Phase::Playing, &mut events);
                let toward = state.reset_match();
                events.push(GameEvent::Serve { toward });
                log::info!("Match started ({})", state.difficulty.as_str());
            }
            return events;
        }
        Phase::GameOver => {
            if input.start {
                set_phase(state, Phase::Menu, &mut events);
                state.reset_to_menu();
            }
            return events;
        }
        Phase::Paused => {
            if !input.pause {
                return events;
            }
            set_phase(state, Phase::Playing, &mut events);
        }
        Phase::Playing => {
            if input.pause {
                set_phase(state, Phase::Paused, &mut events);
                return events;
            }
        }
    }

    state.time_ticks += 1;

    // Serve cooldown: the human paddle still moves, the ball stays put
    if state.resetting {
        move_player(state, input);
        state.reset_timer_ms += dt_ms;
        if state.reset_timer_ms >= state.config().serve_delay_ms {
            state.resetting = false;
            state.reset_timer_ms = 0.0;
            let toward = state.serve();
            events.push(GameEvent::Serve { toward });
        }
        return events;
    }

    move_player(state, input);

    let (opponent, paddle, ball, profile, config, rng) = state.opponent_parts();
    opponent.update(paddle, ball, profile, config, dt_ms, rng);

    if let Some(side) = step_ball(state, &mut events) {
        score_point(state, side, &mut events);
    }

    events
}

fn set_phase(state: &mut MatchState, to: Phase, events: &mut Vec<GameEvent>) {
    let from = state.phase;
    state.phase = to;
    events.push(GameEvent::PhaseChanged { from, to });
    log::info!("Phase {:?} -> {:?}", from, to);
}

/// Human paddle: absolute target wins over up/down; both keys cancel out
fn move_player(state: &mut MatchState, input: &TickInput) {
    let (paddle, config) = state.player_parts();

    if let Some(y) = input.target_y.filter(|y| y.is_finite()) {
        paddle.set_center_y(y, config);
        return;
    }

    let direction = match (input.up, input.down) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    if direction != 0.0 {
        paddle.move_by(direction * config.paddle_speed, config);
    }
}

/// Integrate, reflect and bounce the ball. Returns the scoring side if it left the court.
fn step_ball(state: &mut MatchState, events: &mut Vec<GameEvent>) -> Option<Side> {
    let (ball, left, right, config) = state.physics_parts();

    collision::integrate(ball);

    if collision::reflect_walls(ball, config.canvas_height).is_some() {
        events.push(GameEvent::WallBounce {
            x: ball.pos.x,
            y: ball.pos.y,
        });
    }

    for paddle in [left, right] {
        if collision::paddle_hit(ball, paddle) {
            let bounce = collision::bounce(ball, paddle, config);
            log::trace!(
                "{:?} paddle hit at {:.1} deg, speed {:.1}",
                paddle.side,
                bounce.angle_deg,
                bounce.speed
            );
            events.push(GameEvent::PaddleHit {
                side: paddle.side,
                x: bounce.contact.x,
                y: bounce.contact.y,
                speed: bounce.speed,
            });
        }
    }

    ball.record_trail(config.effects.trail_length);

    collision::scoring_side(ball, config.canvas_width)
}

/// Award the point, then either end the match or start the serve cooldown
fn score_point(state: &mut MatchState, side: Side, events: &mut Vec<GameEvent>) {
    let total = state.score.award(side);
    events.push(GameEvent::PointScored {
        side,
        x: state.ball.pos.x,
        y: state.ball.pos.y,
        score: state.score,
    });
    log::debug!(
        "Point to {:?}: {}-{}",
        side,
        state.score.left,
        state.score.right
    );

    if total >= state.config().winning_score {
        // Straight to game over, no serve cooldown
        state.winner = Some(side);
        events.push(GameEvent::MatchWon { side });
        set_phase(state, Phase::GameOver, events);
        log::info!(
            "Match won by {:?} ({}-{})",
            side,
            state.score.left,
            state.score.right
        );
    } else {
        state.resetting = true;
        state.reset_timer_ms = 0.0;
    }
}
