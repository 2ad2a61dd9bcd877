// Helpers for dealing with the page: finding the mount point, creating the
// canvas inside it and measuring the container's content box

use crate::color::Color;
use crate::error::{describe, InitError};
use crate::surface::{Canvas, Geometry};
use vecmath::Vector2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Window};

pub fn window() -> Result<Window, InitError> {
    web_sys::window().ok_or(InitError::NoWindow)
}

pub fn mount_point(document: &Document, id: &str) -> Result<HtmlElement, InitError> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| InitError::MountNotFound(id.to_owned()))
}

pub struct HtmlCanvas {
    window: Window,
    container: HtmlElement,
    element: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl HtmlCanvas {
    // The canvas only joins the page once it has handed out a 2d context
    pub fn attach(window: &Window, document: &Document, container: HtmlElement) -> Result<Self, InitError> {
        let element = document
            .create_element("canvas")
            .map_err(|e| InitError::CanvasCreation(describe(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| InitError::CanvasCreation("element is not a canvas".to_owned()))?;
        let context = element
            .get_context("2d")
            .map_err(|_| InitError::ContextUnavailable)?
            .ok_or(InitError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| InitError::ContextUnavailable)?;
        container
            .append_child(&element)
            .map_err(|e| InitError::CanvasCreation(describe(&e)))?;

        Ok(HtmlCanvas {
            window: window.clone(),
            container,
            element,
            context,
        })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }

    pub fn detach(&self) {
        self.element.remove();
    }

    /// Viewport coordinates to canvas coordinates.
    pub fn local_point(&self, client_x: f64, client_y: f64) -> Vector2<f64> {
        let rect = self.element.get_bounding_client_rect();
        [client_x - rect.left(), client_y - rect.top()]
    }

    fn padding(&self) -> (f64, f64) {
        let style = match self.window.get_computed_style(&self.container) {
            Ok(Some(style)) => style,
            _ => return (0.0, 0.0),
        };
        let px = |name: &str| {
            style
                .get_property_value(name)
                .ok()
                .and_then(|value| value.trim().trim_end_matches("px").parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        (
            px("padding-left") + px("padding-right"),
            px("padding-top") + px("padding-bottom"),
        )
    }
}

impl Canvas for HtmlCanvas {
    fn container_size(&self) -> Geometry {
        let (pad_x, pad_y) = self.padding();
        Geometry::new(
            (self.container.client_width() as f64 - pad_x).max(0.0),
            (self.container.client_height() as f64 - pad_y).max(0.0),
        )
    }

    fn set_size(&mut self, size: Geometry) {
        self.element.set_width(size.width as u32);
        self.element.set_height(size.height as u32);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.context.set_global_alpha(alpha);
    }

    #[allow(deprecated)]
    fn set_stroke_color(&mut self, color: Color) {
        self.context.set_stroke_style(&JsValue::from_str(&color.to_css()));
    }

    #[allow(deprecated)]
    fn set_fill_color(&mut self, color: Color) {
        self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        // Only throws for a negative radius
        let _ = self.context.arc(x, y, radius, start_angle, end_angle);
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill(&mut self) {
        self.context.fill();
    }
}
