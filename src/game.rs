//! Frame driver
//!
//! Turns frame timestamps into simulation deltas, runs the match tick, routes
//! the resulting events into particle effects and hands back a snapshot.

use std::f32::consts::PI;

use crate::config::{Config, ConfigError};
use crate::sim::{self, GameEvent, MatchSnapshot, MatchState, ParticlePool, Phase, Side, TickInput};

/// Game instance holding all simulation state
#[derive(Debug, Clone)]
pub struct Game {
    state: MatchState,
    particles: ParticlePool,
    /// Timestamp of the previous frame; `None` until the first frame
    last_time: Option<f64>,
}

impl Game {
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        // Separate stream so visual randomness never perturbs gameplay
        let particles = ParticlePool::new(&config.effects, seed ^ 0x9e37_79b9_7f4a_7c15);
        let state = MatchState::new(config, seed)?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            state,
            particles,
            last_time: None,
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    /// Current state without advancing
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.state, Vec::new())
    }

    /// Advance using an absolute frame timestamp (ms). The first frame has a zero delta.
    pub fn frame(&mut self, timestamp_ms: f64, input: &TickInput) -> MatchSnapshot {
        let delta = match self.last_time {
            Some(last) => (timestamp_ms - last) as f32,
            None => 0.0,
        };
        self.last_time = Some(timestamp_ms);
        self.tick(delta, input)
    }

    /// Advance by `delta_ms`, clamped to `[0, max_frame_delta_ms]`
    pub fn tick(&mut self, delta_ms: f32, input: &TickInput) -> MatchSnapshot {
        let max = self.state.config().max_frame_delta_ms;
        let dt = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, max)
        } else {
            0.0
        };

        let events = sim::tick(&mut self.state, input, dt);
        self.apply_effects(&events);

        if self.state.phase != Phase::Paused {
            self.particles.step(dt);
        }

        MatchSnapshot::capture(&self.state, events)
    }

    fn apply_effects(&mut self, events: &[GameEvent]) {
        let config = self.state.config();
        let fx = &config.effects;

        for event in events {
            match *event {
                GameEvent::PhaseChanged {
                    from: Phase::Menu,
                    to: Phase::Playing,
                } => self.particles.clear(),
                GameEvent::PaddleHit { side, x, y, .. } => {
                    // Sparks follow the ball away from the paddle
                    let direction = match side {
                        Side::Left => 0.0,
                        Side::Right => PI,
                    };
                    self.particles.spawn_directional(
                        x,
                        y,
                        fx.paddle_hit_particles,
                        fx.paddle_hit_color,
                        direction,
                        fx.paddle_hit_spread_deg,
                    );
                }
                GameEvent::PointScored { x, y, .. } => {
                    self.particles.spawn_radial(
                        x,
                        y,
                        fx.score_particles,
                        fx.score_color,
                        fx.score_particle_speed,
                    );
                }
                GameEvent::MatchWon { .. } => {
                    self.particles.spawn_radial(
                        config.canvas_width / 2.0,
                        config.canvas_height / 2.0,
                        fx.win_particles,
                        fx.win_color,
                        fx.score_particle_speed * 2.0,
                    );
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut game = Game::new(Config::default(), 1).unwrap();
        game.frame(10_000.0, &start());
        game.state_mut().resetting = true;

        game.frame(10_000.0, &TickInput::default());
        assert_eq!(game.state().reset_timer_ms, 0.0);

        game.frame(10_050.0, &TickInput::default());
        assert_eq!(game.state().reset_timer_ms, 50.0);
    }

    #[test]
    fn test_zero_delta_cap_refused() {
        let config = Config {
            max_frame_delta_ms: 0.0,
            ..Config::default()
        };
        assert!(matches!(Game::new(config, 1), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_small_delta_cap_still_serves() {
        let config = Config {
            max_frame_delta_ms: 1.0,
            ..Config::default()
        };
        let mut game = Game::new(config, 7).unwrap();
        game.tick(0.0, &start());
        {
            let state = game.state_mut();
            state.ball.pos = Vec2::new(10.0, 40.0);
            state.ball.vel = Vec2::new(-5.0, 0.0);
            state.left.y = 400.0;
        }
        assert!(game.tick(16.0, &TickInput::default()).resetting);

        let mut ticks = 0;
        while game.state().resetting {
            game.tick(16.0, &TickInput::default());
            ticks += 1;
            assert!(ticks <= 1000, "serve never fired");
        }
        assert_eq!(ticks, 1000);

        // Score burst drains too (lifetimes are under a second)
        for _ in 0..100 {
            game.tick(16.0, &TickInput::default());
        }
        let burst = game.particles().snapshot();
        assert!(burst.len() < game.state().config().effects.score_particles);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut game = Game::new(Config::default(), 2).unwrap();
        game.tick(0.0, &start());
        game.state_mut().resetting = true;

        game.tick(5_000.0, &TickInput::default());
        assert_eq!(game.state().reset_timer_ms, 100.0);

        // Clock going backwards counts as no time
        game.frame(1_000.0, &TickInput::default());
        game.frame(500.0, &TickInput::default());
        assert_eq!(game.state().reset_timer_ms, 100.0);
    }

    #[test]
    fn test_paddle_hit_spawns_sparks() {
        let mut game = Game::new(Config::default(), 3).unwrap();
        game.tick(0.0, &start());
        {
            let state = game.state_mut();
            state.ball.pos = Vec2::new(755.0, 300.0);
            state.ball.vel = Vec2::new(5.0, 0.0);
            state.right.y = 250.0;
            state.difficulty = crate::config::Difficulty::Impossible;
        }

        let snapshot = game.tick(16.0, &TickInput::default());
        let snapshot = if snapshot.events.is_empty() {
            game.tick(16.0, &TickInput::default())
        } else {
            snapshot
        };
        assert!(snapshot
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PaddleHit { side: Side::Right, .. })));
        let fx = &game.state().config().effects;
        assert_eq!(game.particles().active_count(), fx.paddle_hit_particles);
        // Sparks head back toward the left
        for p in game.particles().snapshot() {
            assert!(p.x < 765.0);
        }
    }

    #[test]
    fn test_point_spawns_burst() {
        let mut game = Game::new(Config::default(), 4).unwrap();
        game.tick(0.0, &start());
        {
            let state = game.state_mut();
            state.ball.pos = Vec2::new(10.0, 40.0);
            state.ball.vel = Vec2::new(-5.0, 0.0);
            state.left.y = 400.0;
        }
        let snapshot = game.tick(16.0, &TickInput::default());
        assert!(snapshot.resetting);
        assert_eq!(snapshot.score.right, 1);
        assert_eq!(
            game.particles().active_count(),
            game.state().config().effects.score_particles
        );
    }

    #[test]
    fn test_pause_freezes_particles() {
        let mut game = Game::new(Config::default(), 5).unwrap();
        game.tick(0.0, &start());
        {
            let state = game.state_mut();
            state.ball.pos = Vec2::new(10.0, 40.0);
            state.ball.vel = Vec2::new(-5.0, 0.0);
            state.left.y = 400.0;
        }
        game.tick(16.0, &TickInput::default());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        game.tick(16.0, &pause);
        let before = game.particles().snapshot();
        for _ in 0..10 {
            game.tick(16.0, &TickInput::default());
        }
        assert_eq!(game.particles().snapshot(), before);
    }

    #[test]
    fn test_new_match_clears_particles() {
        let mut game = Game::new(Config::default(), 6).unwrap();
        game.tick(0.0, &start());
        {
            let state = game.state_mut();
            state.score.left = 10;
            state.ball.pos = Vec2::new(790.0, 40.0);
            state.ball.vel = Vec2::new(5.0, 0.0);
            state.right.y = 400.0;
        }
        let snapshot = game.tick(16.0, &TickInput::default());
        assert_eq!(snapshot.phase, Phase::GameOver);
        assert_eq!(snapshot.winner, Some(Side::Left));
        assert!(game.particles().active_count() > 0);

        game.tick(16.0, &start());
        game.tick(16.0, &start());
        assert_eq!(game.state().phase, Phase::Playing);
        assert_eq!(game.particles().active_count(), 0);
    }
}
