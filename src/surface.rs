// Drawing surface seam. The browser canvas implements Canvas in dom.rs,
// tests use a recording implementation.

use crate::color::Color;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(width: f64, height: f64) -> Self {
        Geometry { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A 2D drawing surface that lives inside a measurable container.
pub trait Canvas {
    /// Content box of the container, padding excluded.
    fn container_size(&self) -> Geometry;
    fn set_size(&mut self, size: Geometry);

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
}

/// Sizes the canvas to its container and returns the new geometry. A
/// container that reports no area leaves the canvas and `current` untouched.
pub fn init_surface<C: Canvas + ?Sized>(canvas: &mut C, current: Geometry) -> Geometry {
    let measured = canvas.container_size();
    if measured.is_empty() {
        log::warn!(
            "container reports {}x{}, leaving surface at {}x{}",
            measured.width,
            measured.height,
            current.width,
            current.height
        );
        return current;
    }
    // Canvas backing stores are whole pixels
    let size = Geometry::new(measured.width.floor(), measured.height.floor());
    canvas.set_size(size);
    size
}

pub fn clear<C: Canvas + ?Sized>(canvas: &mut C, geometry: Geometry) {
    if !geometry.is_empty() {
        canvas.clear_rect(0.0, 0.0, geometry.width, geometry.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawOp, RecordingCanvas};

    #[test]
    fn sizes_canvas_to_container() {
        let mut canvas = RecordingCanvas::new(Geometry::new(800.7, 600.2));
        let size = init_surface(&mut canvas, Geometry::default());
        assert_eq!(size, Geometry::new(800.0, 600.0));
        assert_eq!(canvas.size, Geometry::new(800.0, 600.0));
    }

    #[test]
    fn zero_sized_container_is_a_no_op() {
        let mut canvas = RecordingCanvas::new(Geometry::new(0.0, 600.0));
        let previous = Geometry::new(300.0, 150.0);
        assert_eq!(init_surface(&mut canvas, previous), previous);
        assert_eq!(canvas.size, Geometry::default());
    }

    #[test]
    fn clearing_an_empty_surface_draws_nothing() {
        let mut canvas = RecordingCanvas::new(Geometry::default());
        clear(&mut canvas, Geometry::default());
        assert!(canvas.ops.is_empty());
        clear(&mut canvas, Geometry::new(10.0, 10.0));
        assert_eq!(canvas.ops, vec![DrawOp::ClearRect(0.0, 0.0, 10.0, 10.0)]);
    }
}
