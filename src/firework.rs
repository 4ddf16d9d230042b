use glam::Vec2;
use tracing::debug;

use crate::color::Rgb;
use crate::particle::Particle;
use crate::surface::Surface;

/// Number of children released by one explosion.
pub const CHILD_COUNT: usize = 100;

/// A rocket that climbs until its apex, then bursts into decaying children.
#[derive(Debug, Clone)]
pub struct Firework {
    rocket: Particle,
    children: Vec<Particle>,
    exploded: bool,
    color: Rgb,
    has_inverted: bool,
    gravity: Vec2,
    rng: fastrand::Rng,
}

impl Firework {
    /// Launches a rocket from `position`.
    ///
    /// The firework forks its own generator from `rng` and keeps it for the
    /// explosion, so each firework owns all of its randomness.
    pub fn new(rng: &mut fastrand::Rng, position: Vec2, gravity: Vec2, velocity: Vec2) -> Self {
        let mut rng = rng.fork();
        let color = Rgb::random(&mut rng);
        // One firework in three mixes in complementary children.
        let has_inverted = rng.u32(0..3) == 0;

        Self {
            rocket: Particle::new(position, velocity, color),
            children: Vec::new(),
            exploded: false,
            color,
            has_inverted,
            gravity,
            rng,
        }
    }

    pub fn rocket(&self) -> &Particle {
        &self.rocket
    }

    pub fn children(&self) -> &[Particle] {
        &self.children
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn has_inverted(&self) -> bool {
        self.has_inverted
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// True once the firework has burst and every child has faded out.
    pub fn valid(&self) -> bool {
        self.exploded && self.children.is_empty()
    }

    pub fn update(&mut self) {
        if !self.exploded {
            self.rocket.apply_force(self.gravity);
            self.rocket.update();

            // Vertical speed no longer negative: apex reached.
            if self.rocket.velocity().y >= 0.0 {
                self.explode();
            }
        } else {
            for child in &mut self.children {
                child.apply_force(self.gravity);
                child.update();
            }

            self.children.retain(|child| !child.valid());
        }
    }

    fn explode(&mut self) {
        if self.exploded {
            return;
        }

        let position = self.rocket.position();
        let (color, has_inverted) = (self.color, self.has_inverted);
        let rng = &mut self.rng;

        self.children
            .extend((0..CHILD_COUNT).map(|_| Particle::child(rng, position, color, has_inverted)));
        self.exploded = true;

        debug!(x = position.x, y = position.y, color = %color.to_hex(), has_inverted, "firework exploded");
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: Option<&mut S>) {
        let Some(surface) = surface else {
            return;
        };

        if !self.exploded {
            self.rocket.draw(Some(&mut *surface));
        }

        for child in &self.children {
            child.draw(Some(&mut *surface));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{Call, Recorder};

    fn launch(seed: u64) -> Firework {
        Firework::new(
            &mut fastrand::Rng::with_seed(seed),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 0.1),
            Vec2::new(0.0, -5.0),
        )
    }

    fn run_until_exploded(firework: &mut Firework) -> usize {
        for tick in 1..=1000 {
            firework.update();
            if firework.exploded() {
                return tick;
            }
        }
        panic!("firework never exploded");
    }

    #[test]
    fn starts_ascending_with_no_children() {
        let firework = launch(1);
        assert!(!firework.exploded());
        assert!(!firework.valid());
        assert!(firework.children().is_empty());
        assert_eq!(firework.rocket().color(), firework.color());
        assert_eq!(firework.rocket().position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn rocket_slows_monotonically_and_explodes_at_apex() {
        let mut firework = launch(2);
        let mut previous = firework.rocket().velocity().y;

        while !firework.exploded() {
            firework.update();
            let vy = firework.rocket().velocity().y;
            assert!(vy >= previous);
            if !firework.exploded() {
                assert!(vy < 0.0, "apex passed without exploding");
            } else {
                assert!(vy >= 0.0);
            }
            previous = vy;
        }
    }

    #[test]
    fn explosion_spawns_exactly_one_batch_at_the_rocket() {
        let mut firework = launch(3);
        let ticks = run_until_exploded(&mut firework);
        assert!((50..=52).contains(&ticks), "exploded after {ticks} ticks");

        let apex = firework.rocket().position();
        assert_eq!(firework.children().len(), CHILD_COUNT);
        assert!(firework.children().iter().all(|child| child.position() == apex));

        let first = firework.children()[0].velocity();
        assert!(firework.children().iter().any(|child| child.velocity() != first));

        // The rocket is no longer simulated and no second batch appears.
        firework.update();
        assert_eq!(firework.rocket().position(), apex);
        assert_eq!(firework.children().len(), CHILD_COUNT);

        firework.explode();
        assert_eq!(firework.children().len(), CHILD_COUNT);
    }

    #[test]
    fn becomes_valid_once_every_child_fades() {
        let mut firework = launch(4);
        run_until_exploded(&mut firework);

        let mut ticks = 0;
        while !firework.valid() {
            assert!(firework.exploded());
            firework.update();
            ticks += 1;
            assert!(ticks <= 200, "children outlived their lifespan");
        }
        assert!(firework.children().is_empty());

        for _ in 0..10 {
            firework.update();
            assert!(firework.valid());
        }
    }

    #[test]
    fn inversion_flag_hits_about_a_third() {
        let mut rng = fastrand::Rng::with_seed(5);
        let inverted = (0..3000)
            .filter(|_| Firework::new(&mut rng, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO).has_inverted())
            .count();
        assert!((850..=1150).contains(&inverted), "{inverted} inverted fireworks");
    }

    #[test]
    fn children_colors_follow_the_parent() {
        let mut rng = fastrand::Rng::with_seed(6);
        for _ in 0..50 {
            let mut firework = Firework::new(&mut rng, Vec2::ZERO, Vec2::new(0.0, 1.0), Vec2::ZERO);
            firework.update();
            assert!(firework.exploded());

            let color = firework.color();
            for child in firework.children() {
                if firework.has_inverted() {
                    assert!(child.color() == color || child.color() == color.inverted());
                } else {
                    assert_eq!(child.color(), color);
                }
            }
        }
    }

    #[test]
    fn draws_rocket_only_before_exploding() {
        let mut firework = launch(7);
        let mut recorder = Recorder::default();
        firework.draw(Some(&mut recorder));
        assert_eq!(recorder.count(&Call::Fill), 1);

        run_until_exploded(&mut firework);
        let mut recorder = Recorder::default();
        firework.draw(Some(&mut recorder));
        assert_eq!(recorder.count(&Call::Fill), 0);
        assert_eq!(recorder.count(&Call::Stroke), CHILD_COUNT);

        firework.draw::<Recorder>(None);
    }
}
