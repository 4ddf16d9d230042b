use std::f32::consts::TAU;

use glam::Vec2;

use crate::color::Rgb;
use crate::surface::Surface;

/// Radius of a rocket dot.
pub const ROCKET_RADIUS: f32 = 2.5;
/// Per-tick velocity multiplier applied to explosion children.
pub const VELOCITY_DAMPING: f32 = 0.8;
/// Lifespan lost by a child each tick. A full-lifespan child lasts 100-150 ticks.
pub const LIFESPAN_STEP: f32 = 0.008;
/// Children launch with each axis in `rng.f32() * [-SPREAD, SPREAD]`.
pub const CHILD_SPREAD: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Triangle,
    Square,
}

impl Shape {
    fn random(rng: &mut fastrand::Rng) -> Self {
        match rng.usize(0..3) {
            0 => Shape::Circle,
            1 => Shape::Triangle,
            _ => Shape::Square,
        }
    }
}

/// Lifecycle state of a decaying particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    pub lifespan: f32,
    pub size: f32,
    pub shape: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    /// A rocket: never expires on its own, drawn as a solid dot.
    Simple,
    /// An explosion child: damped, fading, drawn as an outlined shape.
    Decaying(Decay),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    color: Rgb,
    kind: Kind,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, color: Rgb) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            color,
            kind: Kind::Simple,
        }
    }

    /// Builds one explosion child at `position`.
    ///
    /// The velocity is randomized per child. When the parent firework carries
    /// inverted particles, one child in five takes the complementary colour.
    pub fn child(rng: &mut fastrand::Rng, position: Vec2, color: Rgb, has_inverted: bool) -> Self {
        let velocity = Vec2::new(
            rng.f32() * rng.i32(-CHILD_SPREAD..=CHILD_SPREAD) as f32,
            rng.f32() * rng.i32(-CHILD_SPREAD..=CHILD_SPREAD) as f32,
        );

        let decay = Decay {
            lifespan: rng.i32(80..=120) as f32 / 100.0,
            size: rng.i32(10..=20) as f32 / 10.0,
            shape: Shape::random(rng),
        };

        let color = if has_inverted && rng.u32(0..5) == 0 {
            color.inverted()
        } else {
            color
        };

        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            color,
            kind: Kind::Decaying(decay),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn lifespan(&self) -> Option<f32> {
        match self.kind {
            Kind::Simple => None,
            Kind::Decaying(decay) => Some(decay.lifespan),
        }
    }

    /// Accumulates a force until the next `update`.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Advances one tick (semi-implicit Euler).
    pub fn update(&mut self) {
        if let Kind::Decaying(decay) = &mut self.kind {
            self.velocity *= VELOCITY_DAMPING;
            decay.lifespan -= LIFESPAN_STEP;
        }

        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    /// Whether the particle is spent. Rockets never are.
    pub fn valid(&self) -> bool {
        match self.kind {
            Kind::Simple => false,
            Kind::Decaying(decay) => decay.lifespan <= 0.0,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: Option<&mut S>) {
        let Some(surface) = surface else {
            return;
        };

        match self.kind {
            Kind::Simple => self.draw_dot(surface),
            Kind::Decaying(decay) => self.draw_shape(surface, decay),
        }
    }

    fn draw_dot<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.begin_path();
        surface.arc(self.position, ROCKET_RADIUS, 0.0, TAU);
        surface.set_fill_color(self.color);
        surface.set_stroke_color(self.color);
        surface.fill();
        surface.stroke();
        surface.close_path();
    }

    fn draw_shape<S: Surface + ?Sized>(&self, surface: &mut S, decay: Decay) {
        let Vec2 { x, y } = self.position;
        let size = decay.size;

        surface.begin_path();
        surface.set_global_alpha(decay.lifespan.max(0.0));

        match decay.shape {
            Shape::Circle => surface.arc(self.position, size, 0.0, TAU),
            Shape::Triangle => {
                surface.move_to(Vec2::new(x + size, y));
                surface.line_to(Vec2::new(x, y - size));
                surface.line_to(Vec2::new(x - size, y));
                surface.line_to(Vec2::new(x + size, y));
            }
            Shape::Square => {
                surface.move_to(Vec2::new(x, y));
                surface.line_to(Vec2::new(x + size, y));
                surface.line_to(Vec2::new(x + size, y + size));
                surface.line_to(Vec2::new(x, y + size));
                surface.line_to(Vec2::new(x, y));
            }
        }

        surface.set_stroke_color(self.color);
        surface.stroke();
        surface.close_path();
        // Alpha only applies to this shape.
        surface.set_global_alpha(1.0);
    }
}
