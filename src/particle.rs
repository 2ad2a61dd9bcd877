// Particle struct keeping track of position, velocity, fade-in opacity,
// radius and color, plus the factory that rolls new ones

use crate::color::Color;
use crate::config::{BOUNDARY_MARGIN, FADE_IN_STEP, MAX_RADIUS, MIN_RADIUS};
use crate::surface::Geometry;
use rand::rngs::SmallRng;
use rand::Rng;
use vecmath::{vec2_add, Vector2};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub opacity: f64,
    pub radius: f64,
    // None only when the palette is empty, such particles are never drawn
    pub color: Option<Color>,
}

impl Particle {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, color: Option<Color>) -> Particle {
        Particle {
            pos,
            vel,
            opacity: 0.0,
            radius,
            color,
        }
    }

    pub fn fade_in(&mut self) {
        self.opacity = (self.opacity + FADE_IN_STEP).min(1.0);
    }

    /// Turns the particle back once it has drifted more than the margin past
    /// an edge. Only the outward component is flipped, so a particle that has
    /// already turned keeps heading home instead of flipping again while it is
    /// still outside the band.
    pub fn bounce(&mut self, bounds: Geometry) {
        let limits = [bounds.width, bounds.height];
        for axis in 0..2 {
            if self.pos[axis] > limits[axis] + BOUNDARY_MARGIN {
                self.vel[axis] = -self.vel[axis].abs();
            } else if self.pos[axis] < -BOUNDARY_MARGIN {
                self.vel[axis] = self.vel[axis].abs();
            }
        }
    }

    // One frame worth of motion
    pub fn update(&mut self, bounds: Geometry) {
        self.fade_in();
        self.bounce(bounds);
        self.pos = vec2_add(self.pos, self.vel);
    }
}

/// Rolls particles with the configured speed and palette.
pub struct ParticleFactory {
    rng: SmallRng,
    speed: f64,
    palette: Vec<Color>,
}

impl ParticleFactory {
    pub fn with_rng(speed: f64, palette: Vec<Color>, rng: SmallRng) -> Self {
        ParticleFactory { rng, speed, palette }
    }

    /// A particle somewhere inside `bounds`, or at the override coordinates.
    /// `Some(0.0)` is a real coordinate and is honoured.
    pub fn create(&mut self, bounds: Geometry, x: Option<f64>, y: Option<f64>) -> Particle {
        let pos_x = x.unwrap_or_else(|| self.rng.gen::<f64>() * bounds.width);
        let pos_y = y.unwrap_or_else(|| self.rng.gen::<f64>() * bounds.height);
        let vel_x = (self.rng.gen::<f64>() - 0.5) * self.speed;
        let vel_y = (self.rng.gen::<f64>() - 0.5) * self.speed;
        let radius = self.rng.gen_range(MIN_RADIUS..=MAX_RADIUS).round();
        let color = if self.palette.is_empty() {
            None
        } else {
            Some(self.palette[self.rng.gen_range(0..self.palette.len())])
        };
        Particle::new([pos_x, pos_y], [vel_x, vel_y], radius, color)
    }

    /// The pointer-following particle: same look, no velocity.
    pub fn create_anchored(&mut self, at: Vector2<f64>) -> Particle {
        let mut particle = self.create(Geometry::default(), Some(at[0]), Some(at[1]));
        particle.vel = [0.0, 0.0];
        particle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn factory(speed: f64) -> ParticleFactory {
        let palette = vec![Color::from_u32(0xaaaaaaff), Color::from_u32(0xff0000ff)];
        ParticleFactory::with_rng(speed, palette, SmallRng::seed_from_u64(11))
    }

    const BOUNDS: Geometry = Geometry { width: 800.0, height: 600.0 };

    #[test]
    fn created_particles_respect_ranges() {
        let mut factory = factory(2.0);
        for _ in 0..500 {
            let p = factory.create(BOUNDS, None, None);
            assert!((0.0..=800.0).contains(&p.pos[0]));
            assert!((0.0..=600.0).contains(&p.pos[1]));
            assert!(p.vel.iter().all(|v| (-1.0..=1.0).contains(v)));
            assert!(p.radius >= MIN_RADIUS && p.radius <= MAX_RADIUS + 0.5);
            assert_eq!(p.radius.fract(), 0.0);
            assert_eq!(p.opacity, 0.0);
            assert!(p.color.is_some());
        }
    }

    #[test]
    fn zero_override_is_honoured() {
        let mut factory = factory(1.0);
        let p = factory.create(BOUNDS, Some(0.0), Some(0.0));
        assert_eq!(p.pos, [0.0, 0.0]);
        let p = factory.create(BOUNDS, Some(0.0), None);
        assert_eq!(p.pos[0], 0.0);
    }

    #[test]
    fn empty_palette_yields_colorless_particles() {
        let mut factory = ParticleFactory::with_rng(1.0, Vec::new(), SmallRng::seed_from_u64(1));
        assert_eq!(factory.create(BOUNDS, None, None).color, None);
    }

    #[test]
    fn anchored_particles_do_not_move() {
        let mut factory = factory(1.0);
        let mut p = factory.create_anchored([40.0, 50.0]);
        for _ in 0..10 {
            p.update(BOUNDS);
        }
        assert_eq!(p.pos, [40.0, 50.0]);
    }

    #[test]
    fn opacity_fades_in_monotonically_and_clamps() {
        let mut p = Particle::new([10.0, 10.0], [0.0, 0.0], 2.0, None);
        let mut last = p.opacity;
        for _ in 0..150 {
            p.update(BOUNDS);
            assert!(p.opacity >= last);
            assert!((0.0..=1.0).contains(&p.opacity));
            last = p.opacity;
        }
        assert_eq!(p.opacity, 1.0);
    }

    #[test]
    fn leaving_the_margin_flips_velocity_once() {
        let mut p = Particle::new([901.0, 300.0], [0.3, 0.0], 2.0, None);
        p.update(BOUNDS);
        assert_eq!(p.vel[0], -0.3);
        // Still outside the band, but already heading back in
        p.update(BOUNDS);
        assert_eq!(p.vel[0], -0.3);
        assert!(p.pos[0] < 901.0);

        let mut p = Particle::new([300.0, -101.0], [0.0, -0.5], 2.0, None);
        p.update(BOUNDS);
        assert_eq!(p.vel[1], 0.5);
        p.update(BOUNDS);
        assert_eq!(p.vel[1], 0.5);
    }

    #[test]
    fn particles_inside_the_band_keep_their_velocity() {
        let mut p = Particle::new([850.0, -50.0], [0.4, -0.4], 2.0, None);
        p.update(BOUNDS);
        assert_eq!(p.vel, [0.4, -0.4]);
        assert!((p.pos[0] - 850.4).abs() < 1e-9);
        assert!((p.pos[1] + 50.4).abs() < 1e-9);
    }
}
