use glam::Vec2;
use neon_pong::sim::{GameEvent, MatchState, Phase, Side, TickInput, collision, tick};
use neon_pong::{Config, Difficulty, Game};
use proptest::prelude::*;

fn start() -> TickInput {
    TickInput {
        start: true,
        ..Default::default()
    }
}

/// Arbitrary per-tick input, including garbage pointer values
fn arb_input() -> impl Strategy<Value = TickInput> {
    (
        any::<bool>(),
        any::<bool>(),
        prop_oneof![
            Just(None),
            (-2000.0f32..2000.0).prop_map(Some),
            Just(Some(f32::NAN)),
            Just(Some(f32::INFINITY)),
        ],
        prop::bool::weighted(0.01),
    )
        .prop_map(|(up, down, target_y, pause)| TickInput {
            up,
            down,
            target_y,
            pause,
            ..Default::default()
        })
}

fn assert_paddles_on_court(state: &MatchState) {
    let max = state.config().paddle_max_y();
    for paddle in [&state.left, &state.right] {
        assert!(
            paddle.y >= 0.0 && paddle.y <= max,
            "{:?} paddle out of band: {}",
            paddle.side,
            paddle.y
        );
    }
}

#[test]
fn test_full_match_reaches_game_over() {
    let config = Config {
        winning_score: 3,
        ..Config::default()
    };
    let mut game = Game::new(config, 2024).unwrap();
    let select = TickInput {
        select_difficulty: Some(1),
        start: true,
        ..Default::default()
    };
    let snapshot = game.tick(16.0, &select);
    assert_eq!(snapshot.difficulty, Difficulty::Easy);
    assert_eq!(snapshot.phase, Phase::Playing);

    // Human never moves; the easy opponent still misses sometimes
    let mut points = Vec::new();
    for _ in 0..100_000 {
        let snapshot = game.tick(16.0, &TickInput::default());
        for event in &snapshot.events {
            if let GameEvent::PointScored { side, .. } = event {
                points.push(*side);
            }
        }
        assert_paddles_on_court(game.state());
        if snapshot.phase == Phase::GameOver {
            break;
        }
    }

    let state = game.state();
    assert_eq!(state.phase, Phase::GameOver);
    let winner = state.winner.expect("winner recorded");
    assert_eq!(state.score.get(winner), 3);
    assert!(state.score.get(winner.opposite()) < 3);
    assert_eq!(points.len() as u32, state.score.left + state.score.right);
}

#[test]
fn test_serve_direction_alternates_between_points() {
    let mut state = MatchState::new(Config::default(), 77).unwrap();
    tick(&mut state, &start(), 0.0);

    let mut serves = vec![state.serve_direction];
    for _ in 0..200_000 {
        let events = tick(&mut state, &TickInput::default(), 16.0);
        for event in events {
            if let GameEvent::Serve { toward } = event {
                serves.push(toward);
            }
        }
        if serves.len() >= 5 || state.phase == Phase::GameOver {
            break;
        }
    }

    assert!(serves.len() >= 5);
    for pair in serves.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_speed_resets_each_serve_and_ramps_within_rally() {
    let mut game = Game::new(Config::default(), 5).unwrap();
    game.tick(0.0, &start());
    let config = game.state().config().clone();

    let mut last_speed = game.state().ball.speed;
    assert_eq!(last_speed, config.ball_initial_speed);

    for _ in 0..50_000 {
        // Pointer-track the ball so rallies run long
        let input = TickInput {
            target_y: Some(game.state().ball.pos.y),
            ..Default::default()
        };
        let snapshot = game.tick(16.0, &input);
        let speed = snapshot.ball.speed;

        if snapshot.events.iter().any(|e| matches!(e, GameEvent::Serve { .. })) {
            assert_eq!(speed, config.ball_initial_speed);
        } else {
            assert!(speed >= last_speed, "speed dropped mid-rally");
        }
        assert!(speed <= config.ball_max_speed);

        for event in &snapshot.events {
            if let GameEvent::PaddleHit { speed, .. } = event {
                let v = snapshot.ball.velocity;
                assert!((v.length() - speed).abs() < 1e-3);
            }
        }

        last_speed = speed;
        if snapshot.phase == Phase::GameOver {
            break;
        }
    }
}

#[test]
fn test_single_hit_per_approach() {
    let mut state = MatchState::new(Config::default(), 8).unwrap();
    tick(&mut state, &start(), 0.0);
    state.difficulty = Difficulty::Impossible;

    let mut last_hit: Option<Side> = None;
    for _ in 0..20_000 {
        let input = TickInput {
            target_y: Some(state.ball.pos.y),
            ..Default::default()
        };
        let events = tick(&mut state, &input, 16.0);
        for event in events {
            match event {
                GameEvent::PaddleHit { side, .. } => {
                    assert_ne!(last_hit, Some(side), "same paddle hit twice in a row");
                    last_hit = Some(side);
                }
                GameEvent::Serve { .. } => last_hit = None,
                _ => {}
            }
        }
        if state.phase == Phase::GameOver {
            break;
        }
    }
}

#[test]
fn test_centre_contact_scenario() {
    let mut state = MatchState::new(Config::default(), 1).unwrap();
    tick(&mut state, &start(), 0.0);
    state.difficulty = Difficulty::Impossible;
    state.right.y = 250.0;
    state.ball.pos = Vec2::new(750.0, 300.0);
    state.ball.vel = Vec2::new(5.0, 0.0);
    state.ball.speed = 5.0;

    let mut hit = None;
    for _ in 0..5 {
        let events = tick(&mut state, &TickInput::default(), 16.0);
        hit = events
            .into_iter()
            .find(|e| matches!(e, GameEvent::PaddleHit { .. }));
        if hit.is_some() {
            break;
        }
    }

    assert!(matches!(hit, Some(GameEvent::PaddleHit { side: Side::Right, .. })));
    assert_eq!(state.ball.speed, 5.5);
    assert!((state.ball.vel.x + 5.5).abs() < 1e-5);
    assert!(state.ball.vel.y.abs() < 1e-5);
}

#[test]
fn test_paused_ticks_are_idempotent() {
    let mut game = Game::new(Config::default(), 31).unwrap();
    game.tick(0.0, &start());
    for _ in 0..30 {
        game.tick(16.0, &TickInput::default());
    }
    let pause = TickInput {
        pause: true,
        ..Default::default()
    };
    game.tick(16.0, &pause);

    let before = serde_json::to_string(&game.snapshot()).unwrap();
    for _ in 0..100 {
        let snapshot = game.tick(16.0, &TickInput::default());
        assert!(snapshot.events.is_empty());
    }
    let after = serde_json::to_string(&game.snapshot()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_reaction_delay_per_difficulty() {
    for difficulty in Difficulty::ALL {
        let config = Config::default();
        let delay = config.profile(difficulty).reaction_delay_ms;
        let mut state = MatchState::new(config, 3).unwrap();
        state.difficulty = difficulty;
        tick(&mut state, &start(), 0.0);

        // Serve toward the opponent and keep the ball approaching
        state.ball.pos = Vec2::new(200.0, 300.0);
        state.ball.vel = Vec2::new(1.0, 0.0);

        let dt = 5.0;
        let mut elapsed = 0.0;
        let mut last_target = state.opponent.target_y();
        let mut resamples = 0;
        for i in 0..200 {
            state.ball.pos.y = 100.0 + i as f32;
            tick(&mut state, &TickInput::default(), dt);
            elapsed += dt;
            if state.opponent.target_y() != last_target {
                assert!(
                    (elapsed - delay.max(dt)).abs() <= dt,
                    "{difficulty:?}: resampled after {elapsed}ms, expected {delay}ms"
                );
                last_target = state.opponent.target_y();
                elapsed = 0.0;
                resamples += 1;
            }
        }
        assert!(resamples > 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_paddles_stay_on_court(
        seed in any::<u64>(),
        inputs in prop::collection::vec(arb_input(), 1..400),
        dt in 0.0f32..50.0,
    ) {
        let mut game = Game::new(Config::default(), seed).unwrap();
        game.tick(0.0, &start());
        for input in &inputs {
            let snapshot = game.tick(dt, input);
            let max = game.state().config().paddle_max_y();
            prop_assert!(snapshot.left_paddle.y >= 0.0 && snapshot.left_paddle.y <= max);
            prop_assert!(snapshot.right_paddle.y >= 0.0 && snapshot.right_paddle.y <= max);
            prop_assert!(snapshot.ball.speed <= game.state().config().ball_max_speed);
        }
    }

    #[test]
    fn prop_bounce_keeps_speed_magnitude(
        offset in -80.0f32..80.0,
        speed in 5.0f32..15.0,
        from_left in any::<bool>(),
    ) {
        let config = Config::default();
        let mut state = MatchState::new(config.clone(), 1).unwrap();
        let paddle = if from_left { state.left.clone() } else { state.right.clone() };
        let ball = &mut state.ball;
        ball.pos.y = paddle.center_y() + offset;
        ball.speed = speed;

        let result = collision::bounce(ball, &paddle, &config);
        prop_assert!((ball.vel.length() - result.speed).abs() < 1e-3);
        prop_assert!(result.angle_deg.abs() <= config.max_bounce_angle_deg + 1e-4);
        prop_assert!(result.speed <= config.ball_max_speed);
        // Leaves toward the far side
        prop_assert_eq!(ball.vel.x > 0.0, from_left);
    }
}
