use glam::Vec2;

use crate::color::Rgb;

/// A 2D path-drawing target, modelled on the web canvas context.
///
/// Particles only ever build one path per draw call: `begin_path`, some
/// geometry, then `fill` and/or `stroke`, then `close_path`.
pub trait Surface {
    fn begin_path(&mut self);
    fn close_path(&mut self);
    /// Arc around `center`, angles in radians, clockwise in screen space.
    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_stroke_color(&mut self, color: Rgb);
    fn set_global_alpha(&mut self, alpha: f32);
}
