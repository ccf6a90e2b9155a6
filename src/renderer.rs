// Renderer that handles 2d canvas calls for the particle background.
// The field only talks to the `Surface` trait so it can be stepped without a browser.

use crate::color::Color;
use crate::dom;
use std::f64::consts::PI;
use vecmath::Vector2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color);
}

pub struct CanvasRenderer {
    pub canvas: HtmlCanvasElement,
    pub context: CanvasRenderingContext2d,
    // Last fill style handed to the context, skips re-parsing the same css string
    // for every particle
    fill_style: Option<Color>,
}

impl CanvasRenderer {
    // Creates a fixed, full-viewport canvas behind the page content and grabs its 2d context
    pub fn attach(document: &Document, width: u32, height: u32) -> Result<Self, JsValue> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        dom::set_styles(
            &canvas,
            &[
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("z-index", "-2"),
            ],
        )?;
        dom::body(document)?.append_child(&canvas)?;

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut renderer = CanvasRenderer {
            canvas,
            context,
            fill_style: None,
        };
        renderer.resize(width, height);
        Ok(renderer)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // Resizing resets the context state, fill style included
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.fill_style = None;
    }
}

impl Surface for CanvasRenderer {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        if self.fill_style != Some(color) {
            #[allow(deprecated)]
            self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
            self.fill_style = Some(color);
        }
        self.context.begin_path();
        // arc only throws on a negative radius, which the field never hands out
        let _ = self.context.arc(center[0], center[1], radius, 0.0, PI * 2.0);
        self.context.fill();
    }
}
