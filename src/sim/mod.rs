//! Simulation module
//!
//! All gameplay logic lives here:
//! - No rendering, audio or platform dependencies
//! - Seeded RNG only
//! - Side effects are reported as `GameEvent`s, never performed

pub mod ai;
pub mod collision;
pub mod particles;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use ai::Opponent;
pub use collision::{Bounce, Wall};
pub use particles::{Particle, ParticlePool, ParticleView};
pub use rect::Rect;
pub use snapshot::{BallView, MatchSnapshot};
pub use state::{Ball, GameEvent, MatchState, Paddle, Phase, Score, Side};
pub use tick::{TickInput, tick};
