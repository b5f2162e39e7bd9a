//! Victory confetti
//!
//! Seeded particle bursts. Delayed bursts are counted down on the field's own
//! clock, so the echo after the main burst needs no platform timer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::anchor::Anchor;

/// Colors particles are drawn in (CSS hex)
pub const PALETTE: [&str; 6] = [
    "#ffffff", "#00966e", "#d62612", "#f6c90e", "#3d7edb", "#ff8fb1",
];

/// Gravity in px/s²
const GRAVITY: f32 = 900.0;
/// Fraction of velocity lost per second
const DRAG: f32 = 1.4;
/// Particle lifetime in seconds
const LIFETIME: f32 = 3.2;

/// A request for one burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiBurst {
    pub particles: u32,
    /// Launch point in percent of the container
    pub origin: Anchor,
    /// Cone width in degrees, centered on straight up
    pub spread_deg: f32,
    /// Launch speed in px/s
    pub speed: f32,
    pub delay_ms: u32,
}

/// A single piece of confetti
#[derive(Debug, Clone, Copy)]
pub struct Confetto {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub spin: f32,
    pub size: f32,
    /// Index into [`PALETTE`]
    pub color: usize,
    /// Remaining life, 1.0 at spawn
    pub life: f32,
}

/// Live particles plus bursts waiting on their delay
#[derive(Debug, Clone)]
pub struct ConfettiField {
    rng: Pcg32,
    pub particles: Vec<Confetto>,
    queued: Vec<(f64, ConfettiBurst)>,
    max_particles: usize,
}

impl ConfettiField {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            particles: Vec::new(),
            queued: Vec::new(),
            max_particles,
        }
    }

    /// Queue a burst; it fires on the first `advance` after its delay
    pub fn launch(&mut self, burst: ConfettiBurst) {
        self.queued.push((burst.delay_ms as f64, burst));
    }

    /// Drop everything, including queued bursts
    pub fn clear(&mut self) {
        self.particles.clear();
        self.queued.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.particles.is_empty() && self.queued.is_empty()
    }

    /// Step the field by `dt` seconds inside a container of the given size
    pub fn advance(&mut self, dt: f32, container: Vec2) {
        let elapsed_ms = dt as f64 * 1000.0;
        let mut due = Vec::new();
        self.queued.retain_mut(|(remaining, burst)| {
            *remaining -= elapsed_ms;
            if *remaining <= 0.0 {
                due.push(*burst);
                false
            } else {
                true
            }
        });
        for burst in due {
            self.emit(&burst, container);
        }

        let damping = (1.0 - DRAG * dt).max(0.0);
        for p in self.particles.iter_mut() {
            p.vel.y += GRAVITY * dt;
            p.vel *= damping;
            p.pos += p.vel * dt;
            p.rotation += p.spin * dt;
            p.life -= dt / LIFETIME;
        }
        self.particles
            .retain(|p| p.life > 0.0 && p.pos.y < container.y + p.size);
    }

    fn emit(&mut self, burst: &ConfettiBurst, container: Vec2) {
        let origin = burst.origin.to_pixels(container);
        let half_spread = burst.spread_deg.to_radians() / 2.0;
        let room = self.max_particles.saturating_sub(self.particles.len());

        for _ in 0..(burst.particles as usize).min(room) {
            let angle = -std::f32::consts::FRAC_PI_2
                + self.rng.random_range(-half_spread..=half_spread);
            let speed = burst.speed * self.rng.random_range(0.55..=1.0);
            self.particles.push(Confetto {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                rotation: self.rng.random_range(0.0..std::f32::consts::TAU),
                spin: self.rng.random_range(-12.0..=12.0),
                size: self.rng.random_range(5.0..=10.0),
                color: self.rng.random_range(0..PALETTE.len()),
                life: 1.0,
            });
        }
    }
}
