use std::ops::RangeInclusive;

use glam::Vec2;
use tracing::{debug, info};

use crate::config::Config;
use crate::firework::Firework;
use crate::surface::Surface;

/// Drives a whole fireworks show: launches rockets at random intervals,
/// ticks them, and drops the ones that have burnt out.
#[derive(Debug)]
pub struct Show {
    size: Vec2,
    gravity: Vec2,
    tick_ms: f32,
    spawn_interval_ms: RangeInclusive<u32>,
    until_spawn_ms: f32,
    visible: bool,
    fireworks: Vec<Firework>,
    rng: fastrand::Rng,
}

impl Show {
    pub fn new(size: Vec2, config: &Config, mut rng: fastrand::Rng) -> Self {
        let spawn_interval_ms = config.spawn_interval_ms.clone();
        let until_spawn_ms = rng.u32(spawn_interval_ms.clone()) as f32;

        Self {
            size,
            gravity: Vec2::new(0.0, config.gravity),
            tick_ms: 1000.0 / config.tick_rate as f32,
            spawn_interval_ms,
            until_spawn_ms,
            visible: true,
            fireworks: Vec::new(),
            rng,
        }
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn resize(&mut self, size: Vec2) {
        info!(width = size.x, height = size.y, "show resized");
        self.size = size;
    }

    /// Hidden shows stop launching and clear out at the next launch slot.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            info!(visible, "show visibility changed");
        }
        self.visible = visible;
    }

    /// Advances the show by one frame.
    pub fn tick(&mut self) {
        self.until_spawn_ms -= self.tick_ms;
        if self.until_spawn_ms <= 0.0 {
            if self.visible {
                self.spawn();
            } else {
                self.purge(true);
            }
            while self.until_spawn_ms <= 0.0 {
                self.until_spawn_ms += self.rng.u32(self.spawn_interval_ms.clone()).max(1) as f32;
            }
        }

        self.purge(false);

        for firework in &mut self.fireworks {
            firework.update();
        }
    }

    /// Launches one rocket from the bottom edge, aimed to burst 80-90% of
    /// the way up.
    pub fn spawn(&mut self) {
        let Vec2 { x: width, y: height } = self.size;
        let rng = &mut self.rng;

        let position = Vec2::new(random_between(rng, 0.0, width), height);
        let apex_height = random_between(rng, height * 0.80, height * 0.90);
        // v^2 = u^2 + 2as with v = 0 at the apex.
        let velocity = Vec2::new(
            -(rng.i32(-1..=1) as f32),
            -(2.0 * self.gravity.y * apex_height).sqrt(),
        );

        debug!(x = position.x, apex_height, "launching firework");
        self.fireworks
            .push(Firework::new(rng, position, self.gravity, velocity));
    }

    /// Drops spent fireworks, or every firework when `reset` is set.
    pub fn purge(&mut self, reset: bool) {
        let before = self.fireworks.len();
        if reset {
            self.fireworks.clear();
        } else {
            self.fireworks.retain(|firework| !firework.valid());
        }

        let removed = before - self.fireworks.len();
        if removed > 0 {
            debug!(removed, reset, remaining = self.fireworks.len(), "purged fireworks");
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: Option<&mut S>) {
        let Some(surface) = surface else {
            return;
        };

        for firework in &self.fireworks {
            firework.draw(Some(&mut *surface));
        }
    }
}

/// Uniform integer in `[ceil(min), floor(max)]`, as a float.
fn random_between(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    let low = min.ceil() as i32;
    let high = (max.floor() as i32).max(low);
    rng.i32(low..=high) as f32
}
