// Renderer struct that handles the canvas calls for one frame: clearing the
// surface, the connecting lines between nearby particles and the particle
// discs themselves.

use crate::color::Color;
use crate::config::NetworkConfig;
use crate::particle::Particle;
use crate::surface::{self, Canvas, Geometry};
use std::f64::consts::PI;
use vecmath::{vec2_len, vec2_sub};

pub struct Renderer {
    pub line_color: Color,
    pub line_width: f64,
    pub line_distance: f64,
}

/// Alpha of the line between `a` and `b`, or None when they are too far
/// apart to be connected. A pair exactly `threshold` apart still connects,
/// with alpha 0.
pub fn line_alpha(a: &Particle, b: &Particle, threshold: f64) -> Option<f64> {
    let dx = (a.pos[0] - b.pos[0]).abs();
    let dy = (a.pos[1] - b.pos[1]).abs();
    // Cheap reject before paying for the square root
    if dx.min(dy) > threshold {
        return None;
    }
    let distance = vec2_len(vec2_sub(a.pos, b.pos));
    if distance > threshold {
        return None;
    }
    Some((threshold - distance) / threshold * a.opacity * b.opacity)
}

impl Renderer {
    pub fn new(config: &NetworkConfig) -> Self {
        Renderer {
            line_color: config.net_line_color,
            line_width: config.net_line_width,
            line_distance: config.net_line_distance,
        }
    }

    pub fn clear_screen<C: Canvas + ?Sized>(&self, canvas: &mut C, geometry: Geometry) {
        surface::clear(canvas, geometry);
        canvas.set_global_alpha(1.0);
    }

    // Every unordered pair once, O(n^2)
    pub fn render_lines<C: Canvas + ?Sized>(&self, canvas: &mut C, particles: &[Particle]) {
        if self.line_distance <= 0.0 {
            return;
        }
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                if let Some(alpha) = line_alpha(a, b, self.line_distance) {
                    canvas.begin_path();
                    canvas.set_stroke_color(self.line_color);
                    canvas.set_global_alpha(alpha);
                    canvas.set_line_width(self.line_width);
                    canvas.move_to(a.pos[0], a.pos[1]);
                    canvas.line_to(b.pos[0], b.pos[1]);
                    canvas.stroke();
                }
            }
        }
    }

    pub fn render_particle<C: Canvas + ?Sized>(&self, canvas: &mut C, particle: &Particle) {
        let color = match particle.color {
            Some(color) => color,
            None => return,
        };
        canvas.begin_path();
        canvas.set_fill_color(color);
        canvas.set_global_alpha(particle.opacity);
        canvas.arc(particle.pos[0], particle.pos[1], particle.radius, 0.0, 2.0 * PI);
        canvas.fill();
    }
}
