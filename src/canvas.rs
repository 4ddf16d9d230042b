use std::f32::consts::TAU;
use std::io::{self, Write};

use glam::Vec2;

use crate::color::Rgb;
use crate::surface::Surface;

/// Premultiplied colour (0-255 channels) plus coverage (0-1).
type Pixel = [f32; 4];

/// A [`Surface`] that rasterizes paths into a pixel grid and renders it to a
/// terminal with half-block characters, two pixels per cell.
///
/// World coordinates are divided by `scale` to land on pixels.
pub struct TerminalCanvas {
    width: usize,
    height: usize,
    scale: f32,
    background: Rgb,
    pixels: Vec<Pixel>,
    path: Vec<Vec<Vec2>>,
    fill_color: Rgb,
    stroke_color: Rgb,
    alpha: f32,
    scratch: Vec<usize>,
    output_buf: Vec<u8>,
}

impl TerminalCanvas {
    pub fn new(width: usize, height: usize, scale: f32, background: Rgb) -> Self {
        Self {
            width,
            height,
            scale,
            background,
            pixels: vec![[0.0; 4]; width * height],
            path: Vec::new(),
            fill_color: Rgb::BLACK,
            stroke_color: Rgb::BLACK,
            alpha: 1.0,
            scratch: Vec::new(),
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    /// Canvas for a terminal of `cols` x `rows` cells.
    pub fn for_terminal(cols: u16, rows: u16, scale: f32, background: Rgb) -> Self {
        Self::new(cols as usize, rows as usize * 2, scale, background)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Size of the drawable area in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.scale
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; width * height];
        self.path.clear();
    }

    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    /// Erases `amount` of every pixel's coverage, leaving fading trails.
    pub fn fade(&mut self, amount: f32) {
        let keep = (1.0 - amount).clamp(0.0, 1.0);
        for pixel in &mut self.pixels {
            for channel in pixel.iter_mut() {
                *channel *= keep;
            }
        }
    }

    /// Final colour of a pixel over the background.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let [r, g, b, a] = self.pixels[y * self.width + x];
        let bg = self.background.to_f32();
        let channel = |c: f32, bg: f32| (c + bg * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
        Rgb(channel(r, bg[0]), channel(g, bg[1]), channel(b, bg[2]))
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.pixel(x, y);
                let bot = if y + 1 < self.height {
                    self.pixel(x, y + 1)
                } else {
                    top
                };

                // Only emit colour codes when they change
                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }

    fn to_pixels(&self, point: Vec2) -> Vec2 {
        point / self.scale
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Appends to the current sub-path, starting one if there is none.
    fn push_point(&mut self, point: Vec2) {
        match self.path.last_mut() {
            Some(sub_path) => sub_path.push(point),
            None => self.path.push(vec![point]),
        }
    }

    /// Bresenham between the pixels holding `from` and `to`.
    fn rasterize_segment(&mut self, from: Vec2, to: Vec2) {
        let (mut x, mut y) = (from.x.floor() as i64, from.y.floor() as i64);
        let (end_x, end_y) = (to.x.floor() as i64, to.y.floor() as i64);

        let dx = (end_x - x).abs();
        let dy = -(end_y - y).abs();
        let step_x = if x < end_x { 1 } else { -1 };
        let step_y = if y < end_y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let Some(idx) = self.index(x, y) {
                self.scratch.push(idx);
            }
            if x == end_x && y == end_y {
                break;
            }

            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += step_x;
            }
            if doubled <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    /// Even-odd fill, sampling pixel centres.
    fn rasterize_fill(&mut self) {
        let points = self.path.iter().flatten();
        let (min_y, max_y) = points.fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        if min_y > max_y {
            return;
        }

        let first_row = (min_y.floor() as i64).max(0);
        let last_row = (max_y.ceil() as i64).min(self.height as i64 - 1);
        let mut crossings = Vec::new();

        for row in first_row..=last_row {
            let sample_y = row as f32 + 0.5;
            crossings.clear();

            for sub_path in &self.path {
                let closing = sub_path.last().zip(sub_path.first());
                let edges = sub_path.windows(2).map(|w| (w[0], w[1])).chain(closing.map(|(a, b)| (*a, *b)));

                for (a, b) in edges {
                    if (a.y <= sample_y) != (b.y <= sample_y) {
                        let t = (sample_y - a.y) / (b.y - a.y);
                        crossings.push(a.x + t * (b.x - a.x));
                    }
                }
            }

            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil() as i64;
                let end = (span[1] - 0.5).ceil() as i64;
                for x in start..end {
                    if let Some(idx) = self.index(x, row) {
                        self.scratch.push(idx);
                    }
                }
            }
        }
    }

    /// Composites every collected pixel once with `color` at the global alpha.
    fn flush_scratch(&mut self, color: Rgb) {
        self.scratch.sort_unstable();
        self.scratch.dedup();

        let alpha = self.alpha;
        let src = color.to_f32().map(|c| c * alpha);

        for &idx in &self.scratch {
            let pixel = &mut self.pixels[idx];
            for channel in 0..3 {
                pixel[channel] = src[channel] + pixel[channel] * (1.0 - alpha);
            }
            pixel[3] = alpha + pixel[3] * (1.0 - alpha);
        }
        self.scratch.clear();
    }
}

impl Surface for TerminalCanvas {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn close_path(&mut self) {
        let Some(first) = self.path.last().and_then(|sub_path| sub_path.first().copied()) else {
            return;
        };
        self.push_point(first);
        self.path.push(vec![first]);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        let center = self.to_pixels(center);
        let radius = radius / self.scale;
        let sweep = (end_angle - start_angle).clamp(-TAU, TAU);
        let segments = ((radius * 4.0).ceil() as usize).clamp(8, 64);

        for i in 0..=segments {
            let angle = start_angle + sweep * (i as f32 / segments as f32);
            self.push_point(center + Vec2::from_angle(angle) * radius);
        }
    }

    fn move_to(&mut self, point: Vec2) {
        let point = self.to_pixels(point);
        self.path.push(vec![point]);
    }

    fn line_to(&mut self, point: Vec2) {
        let point = self.to_pixels(point);
        self.push_point(point);
    }

    fn fill(&mut self) {
        self.rasterize_fill();
        self.flush_scratch(self.fill_color);
    }

    fn stroke(&mut self) {
        let segments: Vec<(Vec2, Vec2)> = self
            .path
            .iter()
            .flat_map(|sub_path| sub_path.windows(2).map(|w| (w[0], w[1])))
            .collect();

        for (from, to) in segments {
            self.rasterize_segment(from, to);
        }
        self.flush_scratch(self.stroke_color);
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.stroke_color = color;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }
}
