//! Particle effects
//!
//! Fixed-capacity pool. Slots are allocated once and recycled through a free
//! list; spawns past capacity are dropped.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::EffectsConfig;
use crate::deg_to_rad;

/// A particle slot
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1 at spawn, counts down to 0
    pub life: f32,
    /// Lifetime in seconds
    pub max_life: f32,
    pub size: f32,
    pub color: u32,
    pub active: bool,
}

/// What a renderer needs to draw one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: u32,
    pub alpha: f32,
}

/// Pooled particle system
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    /// Indices of inactive slots
    free: Vec<usize>,
    /// Indices of active slots
    active: Vec<usize>,
    tuning: EffectsConfig,
    rng: Pcg32,
}

impl ParticlePool {
    /// Pool of `effects.max_particles` slots using the given motion and spawn tuning
    pub fn new(effects: &EffectsConfig, seed: u64) -> Self {
        let capacity = effects.max_particles;
        Self {
            slots: vec![Particle::default(); capacity],
            // Reversed so slot 0 is handed out first
            free: (0..capacity).rev().collect(),
            active: Vec::with_capacity(capacity),
            tuning: effects.clone(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn acquire(&mut self) -> Option<usize> {
        let index = self.free.pop()?;
        self.active.push(index);
        Some(index)
    }

    /// `count` particles evenly spaced around a full circle.
    ///
    /// Returns how many were actually spawned.
    pub fn spawn_radial(&mut self, x: f32, y: f32, count: usize, color: u32, speed: f32) -> usize {
        let mut spawned = 0;
        for i in 0..count {
            let Some(index) = self.acquire() else {
                log::trace!("Particle pool full, dropped {} radial spawns", count - i);
                break;
            };

            let angle = TAU * i as f32 / count as f32;
            let velocity = speed + self.tuning.radial_speed_jitter.sample(&mut self.rng);
            let max_life = self.tuning.radial_life_s.sample(&mut self.rng);
            let size = self.tuning.particle_size.sample(&mut self.rng);

            self.slots[index] = Particle {
                pos: Vec2::new(x, y),
                vel: Vec2::new(angle.cos(), angle.sin()) * velocity,
                life: 1.0,
                max_life,
                size,
                color,
                active: true,
            };
            spawned += 1;
        }
        spawned
    }

    /// `count` particles within a cone of `spread_deg` around `direction` (radians).
    ///
    /// Returns how many were actually spawned.
    pub fn spawn_directional(
        &mut self,
        x: f32,
        y: f32,
        count: usize,
        color: u32,
        direction: f32,
        spread_deg: f32,
    ) -> usize {
        let spread = deg_to_rad(spread_deg);
        let mut spawned = 0;
        for i in 0..count {
            let Some(index) = self.acquire() else {
                log::trace!("Particle pool full, dropped {} directional spawns", count - i);
                break;
            };

            let angle = direction + (self.rng.random::<f32>() - 0.5) * spread;
            let speed = self.tuning.directional_speed.sample(&mut self.rng);
            let max_life = self.tuning.directional_life_s.sample(&mut self.rng);
            let size = self.tuning.particle_size.sample(&mut self.rng);

            self.slots[index] = Particle {
                pos: Vec2::new(x, y),
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                max_life,
                size,
                color,
                active: true,
            };
            spawned += 1;
        }
        spawned
    }

    /// Advance every live particle; expired ones return to the pool.
    ///
    /// Motion is per tick; only `life` is scaled by elapsed time.
    pub fn step(&mut self, dt_ms: f32) {
        let dt = dt_ms / 1000.0;
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let index = self.active[i];
            let p = &mut self.slots[index];

            p.pos += p.vel;
            p.vel.y += self.tuning.gravity;
            p.vel *= self.tuning.drag;
            p.life -= dt / p.max_life;

            if p.life <= 0.0 {
                p.active = false;
                self.active.swap_remove(i);
                self.free.push(index);
            }
        }
    }

    /// Drawable view of live particles
    pub fn snapshot(&self) -> Vec<ParticleView> {
        self.active
            .iter()
            .map(|&index| {
                let p = &self.slots[index];
                ParticleView {
                    x: p.pos.x,
                    y: p.pos.y,
                    size: p.size,
                    color: p.color,
                    alpha: p.life.clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    /// Return every particle to the pool
    pub fn clear(&mut self) {
        for &index in &self.active {
            self.slots[index].active = false;
        }
        self.free.extend(self.active.drain(..));
    }
}
