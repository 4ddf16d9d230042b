//! Fireworks particle simulation.
//!
//! A [`Firework`] climbs as a single rocket [`Particle`], bursts at its apex
//! into a hundred fading children, and reports itself [`valid`](Firework::valid)
//! for removal once they are gone. [`Show`] drives many of them and any
//! [`Surface`] can draw them; [`TerminalCanvas`] draws to a terminal.

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod firework;
pub mod particle;
pub mod show;
pub mod surface;

pub use canvas::TerminalCanvas;
pub use color::Rgb;
pub use config::{Command, Config};
pub use error::{Error, Result};
pub use firework::Firework;
pub use particle::Particle;
pub use show::Show;
pub use surface::Surface;

/// Positions, velocities, accelerations and forces.
pub type Vector2 = glam::Vec2;
