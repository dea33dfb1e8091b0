/// Cosmetic state: mark pop-in, winning-line sweep, particles, shake and glitch
use std::collections::HashMap;

use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::config::{Animation, Config, Theme};
use super::geometry::BoardGeometry;
use super::rules::{GameOutcome, WinningLine};
use crate::core::renderer::{Color, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub color: Color,
    pub age: f32,
    pub lifetime: f32,
    pub radius: f32,
}

impl Particle {
    fn update(&mut self, delta: f32, gravity: f32) {
        self.position = self
            .position
            .offset(self.velocity.x * delta, self.velocity.y * delta);
        self.velocity.y += gravity * delta;
        self.age += delta;
    }

    pub fn is_dead(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Remaining life in [0, 1], used as opacity
    pub fn fade(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

/// Sweep through the winning line, `progress` runs 0 -> 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub line: WinningLine,
    pub progress: f32,
}

/// Nothing here feeds back into gameplay. Missing state (a dropped animation
/// entry, an empty palette, an unusable range) falls back to a static render.
#[derive(Debug, Clone)]
pub struct EffectsEngine {
    animation: Animation,
    theme: Theme,
    rng: StdRng,
    marks: HashMap<(usize, usize), f32>,
    sweep: Option<Sweep>,
    particles: Vec<Particle>,
    shake: f32,
    glitch: f32,
    frame: u64,
}

impl EffectsEngine {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic particle trajectories, for tests and replays
    pub fn with_seed(config: &Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &Config, rng: StdRng) -> Self {
        Self {
            animation: config.animation.clone(),
            theme: config.theme.clone(),
            rng,
            marks: HashMap::new(),
            sweep: None,
            particles: Vec::new(),
            shake: 0.0,
            glitch: 0.0,
            frame: 0,
        }
    }

    pub fn on_mark_placed(&mut self, row: usize, col: usize) {
        self.marks.insert((row, col), 0.0);
    }

    pub fn on_outcome(&mut self, outcome: &GameOutcome, geometry: &BoardGeometry) {
        match outcome {
            GameOutcome::InProgress => {}
            GameOutcome::Win(_, line) => {
                self.sweep = Some(Sweep { line: *line, progress: 0.0 });
                self.spawn_burst(geometry.centroid(), self.theme.win_burst);
                self.shake = self.shake.max(self.theme.shake_on_win);
                self.glitch = self.glitch.max(self.theme.glitch_on_win);
            }
            GameOutcome::Draw => {
                self.spawn_burst(geometry.centroid(), self.theme.draw_burst);
            }
        }
    }

    pub fn spawn_burst(&mut self, origin: Point, count: usize) {
        let defaults = Animation::default();
        let anim = &self.animation;
        let (Some(vx), Some(vy), Some(radius)) = (
            sampler(anim.particle_vx, defaults.particle_vx),
            sampler(anim.particle_vy, defaults.particle_vy),
            sampler(anim.particle_radius, defaults.particle_radius),
        ) else {
            warn!("no usable particle ranges, burst skipped");
            return;
        };
        let lifetime = if anim.particle_lifetime.is_finite() && anim.particle_lifetime >= 0.0 {
            anim.particle_lifetime
        } else {
            defaults.particle_lifetime
        };

        for _ in 0..count {
            let color = self
                .theme
                .particle_colors
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(self.theme.text);
            self.particles.push(Particle {
                position: origin,
                velocity: Point::new(self.rng.sample(&vx), self.rng.sample(&vy)),
                color,
                age: 0.0,
                lifetime,
                radius: self.rng.sample(&radius),
            });
        }
        debug!(count, total = self.particles.len(), "particle burst");
    }

    /// Advance by `delta` 60 Hz frames
    pub fn tick(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        self.frame = self.frame.wrapping_add(1);

        let step = self.animation.mark_pop_step * delta;
        for progress in self.marks.values_mut() {
            *progress = (*progress + step).min(1.0);
        }
        // a missing entry renders at full scale, so saturated ones can go
        self.marks.retain(|_, p| *p < 1.0);

        if let Some(sweep) = self.sweep.as_mut() {
            sweep.progress = (sweep.progress + self.animation.sweep_step * delta).min(1.0);
        }

        let gravity = self.animation.gravity;
        for particle in &mut self.particles {
            particle.update(delta, gravity);
        }
        self.particles.retain(|p| !p.is_dead());

        self.shake = (self.shake - delta).max(0.0);
        self.glitch = (self.glitch - delta).max(0.0);
    }

    /// Drop every transient, as on restart
    pub fn clear(&mut self) {
        self.marks.clear();
        self.sweep = None;
        self.particles.clear();
        self.shake = 0.0;
        self.glitch = 0.0;
    }

    /// Pop-in scale for a mark, 1.0 once its animation is done
    pub fn mark_scale(&self, row: usize, col: usize) -> f32 {
        self.marks.get(&(row, col)).copied().unwrap_or(1.0)
    }

    pub fn animating_marks(&self) -> usize {
        self.marks.len()
    }

    pub fn sweep(&self) -> Option<Sweep> {
        self.sweep
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn shake(&self) -> f32 {
        self.shake
    }

    pub fn glitch(&self) -> f32 {
        self.glitch
    }

    pub fn is_glitching(&self) -> bool {
        self.glitch > 0.0
    }

    /// Jitter applied to board drawing while shaking. Derived from the frame
    /// counter so rendering never touches the random source.
    pub fn shake_offset(&self) -> (f32, f32) {
        if self.shake <= 0.0 {
            return (0.0, 0.0);
        }
        let t = self.frame as f32;
        (self.shake * (t * 1.7).sin(), self.shake * (t * 2.3).cos())
    }
}

fn ordered([a, b]: [f32; 2]) -> [f32; 2] {
    if a <= b { [a, b] } else { [b, a] }
}

/// Inclusive sampler over `bounds` in either order, or over `fallback` when
/// `bounds` cannot be sampled (non-finite, or too wide for f32)
fn sampler(bounds: [f32; 2], fallback: [f32; 2]) -> Option<Uniform<f32>> {
    let [lo, hi] = ordered(bounds);
    Uniform::new_inclusive(lo, hi)
        .inspect_err(|e| warn!(?bounds, error = %e, "unusable particle range, using default"))
        .or_else(|_| Uniform::new_inclusive(fallback[0], fallback[1]))
        .ok()
}
