//! Particle engine
//!
//! Short-lived confetti fragments that burst from the shell. Each particle is
//! simulated independently; the engine owns the live set and reports which
//! visual handles to create, move, or release.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY, PARTICLE_LIFE};
use crate::error::{ClickerError, Result};
use crate::random_between;

/// Frames per second the per-tick gravity increment was tuned at
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

/// How gravity is folded into vertical velocity each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityPolicy {
    /// `vy += gravity` once per tick, whatever the frame duration
    PerTick,
    /// `vy += gravity * dt`
    #[default]
    Scaled,
}

impl GravityPolicy {
    /// Velocity change for one tick of length `dt`
    #[inline]
    pub fn velocity_delta(self, gravity: f32, dt: f32) -> f32 {
        match self {
            GravityPolicy::PerTick => gravity,
            GravityPolicy::Scaled => gravity * dt,
        }
    }
}

/// Initial-state ranges for freshly spawned particles, each `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRanges {
    pub x: [f32; 2],
    pub y: [f32; 2],
    pub vx: [f32; 2],
    /// Negative is up
    pub vy: [f32; 2],
    pub scale: [f32; 2],
    pub angular_velocity: [f32; 2],
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            x: [-150.0, 150.0],
            y: [-200.0, 200.0],
            vx: [-500.0, 500.0],
            vy: [-800.0, -250.0],
            scale: [0.1, 0.5],
            angular_velocity: [-5.0, 5.0],
        }
    }
}

impl SpawnRanges {
    /// Every range as `(name, [min, max])`, for validation
    pub fn named(&self) -> [(&'static str, [f32; 2]); 6] {
        [
            ("x", self.x),
            ("y", self.y),
            ("vx", self.vx),
            ("vy", self.vy),
            ("scale", self.scale),
            ("angular_velocity", self.angular_velocity),
        ]
    }
}

/// Particle physics tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Lifetime of a new particle in seconds
    pub life: f32,
    /// px/s² under `Scaled`, px/s per tick under `PerTick`
    pub gravity: f32,
    pub gravity_policy: GravityPolicy,
    pub spawn: SpawnRanges,
}

impl Default for ParticleTuning {
    /// Frame-rate independent gravity matching the per-tick feel at 60 Hz
    fn default() -> Self {
        Self {
            life: PARTICLE_LIFE,
            gravity: GRAVITY * REFERENCE_FRAME_RATE,
            gravity_policy: GravityPolicy::Scaled,
            spawn: SpawnRanges::default(),
        }
    }
}

impl ParticleTuning {
    /// Flat per-tick gravity increment, frame-rate dependent
    pub fn per_tick() -> Self {
        Self {
            gravity: GRAVITY,
            gravity_policy: GravityPolicy::PerTick,
            ..Self::default()
        }
    }
}

/// A single confetti fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Visual handle key, unique for the engine's lifetime
    pub id: u32,
    /// Offset from the shell origin
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before removal
    pub life: f32,
    pub scale: f32,
    /// Radians
    pub angle: f32,
    /// Radians per second
    pub angular_vel: f32,
}

impl Particle {
    /// Draw a particle with independent uniform initial state
    pub fn random<R: Rng>(id: u32, rng: &mut R, ranges: &SpawnRanges, life: f32) -> Self {
        let mut between = |[min, max]: [f32; 2]| random_between(rng, min, max);
        let pos = Vec2::new(between(ranges.x), between(ranges.y));
        let vel = Vec2::new(between(ranges.vx), between(ranges.vy));
        let scale = between(ranges.scale);
        let angle = between([0.0, std::f32::consts::TAU]);
        let angular_vel = between(ranges.angular_velocity);

        Self {
            id,
            pos,
            vel,
            life,
            scale,
            angle,
            angular_vel,
        }
    }

    /// Advance one tick
    pub fn integrate(&mut self, dt: f32, gravity: f32, policy: GravityPolicy) {
        self.life -= dt;
        self.vel.y += policy.velocity_delta(gravity, dt);
        self.pos += self.vel * dt;
        self.angle += self.angular_vel * dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            id: self.id,
            pos: self.pos,
            angle: self.angle,
            scale: self.scale,
        }
    }
}

/// Renderable transform of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub scale: f32,
}

impl ParticleView {
    /// CSS transform string for a DOM-backed particle
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}rad) scale({}, {})",
            self.pos.x, self.pos.y, self.angle, self.scale, self.scale
        )
    }
}

/// Result of one engine tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    /// Every particle still alive, with its updated transform
    pub live: Vec<ParticleView>,
    /// Handles of particles removed this tick
    pub expired: Vec<u32>,
}

/// Owns the live particle set
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    particles: Vec<Particle>,
    next_id: u32,
    tuning: ParticleTuning,
}

impl Default for ParticleEngine {
    fn default() -> Self {
        Self::new(ParticleTuning::default())
    }
}

impl ParticleEngine {
    pub fn new(tuning: ParticleTuning) -> Self {
        Self {
            particles: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    pub fn tuning(&self) -> &ParticleTuning {
        &self.tuning
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawn `count` particles, returning the new visual handles
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, count: usize) -> Vec<ParticleView> {
        let mut spawned = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);
            let particle = Particle::random(id, rng, &self.tuning.spawn, self.tuning.life);
            spawned.push(particle.view());
            self.particles.push(particle);
        }
        if count > 0 {
            log::debug!("Spawned {} particles ({} live)", count, self.particles.len());
        }
        spawned
    }

    /// Spawn from a signed count, as handed over by script callers
    pub fn try_spawn<R: Rng>(&mut self, rng: &mut R, count: i64) -> Result<Vec<ParticleView>> {
        let count = usize::try_from(count).map_err(|_| ClickerError::InvalidSpawnCount(count))?;
        Ok(self.spawn(rng, count))
    }

    /// Advance every particle by `dt` seconds and drop the expired ones
    pub fn tick(&mut self, dt: f32) -> TickOutput {
        let ParticleTuning {
            gravity,
            gravity_policy,
            ..
        } = self.tuning;

        for particle in self.particles.iter_mut() {
            particle.integrate(dt, gravity, gravity_policy);
        }

        let mut expired = Vec::new();
        self.particles.retain(|p| {
            if p.is_alive() {
                true
            } else {
                expired.push(p.id);
                false
            }
        });

        TickOutput {
            live: self.particles.iter().map(Particle::view).collect(),
            expired,
        }
    }

    /// Drop every particle, returning the released handles
    pub fn clear(&mut self) -> Vec<u32> {
        self.particles.drain(..).map(|p| p.id).collect()
    }
}
