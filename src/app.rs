// Page startup: the particle background, entry transitions and all event wiring.
// Each feature starts on its own so one missing element never blocks the rest.

use crate::config::FieldConfig;
use crate::dom;
use crate::effects::{self, Effects};
use crate::field::{FrameScheduler, ParticleField};
use crate::interactions::{self, messages};
use crate::renderer::CanvasRenderer;
use crate::timers::{Timers, WindowTimers};
use crate::utils::Timer;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

// Re-arms the stored frame closure through requestAnimationFrame
#[derive(Clone)]
pub struct AnimationFrame {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for AnimationFrame {
    fn request_frame(&mut self) {
        if let Some(callback) = self.callback.borrow().as_ref() {
            if let Err(err) = self.window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }
}

/// Window plus an effects handle backed by real timers.
pub fn page_effects() -> Result<(Window, Effects), JsValue> {
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let timers: Rc<dyn Timers> = Rc::new(WindowTimers::new(window.clone()));
    Ok((window, Effects::new(document, timers)))
}

pub fn run(config: FieldConfig) -> Result<(), JsValue> {
    let (window, effects) = page_effects()?;
    let document = effects.document.clone();

    report("particle background", start_background(&window, &document, config).map(|_| ()));
    log::info!("{}", messages::WELCOME);

    effects::play_entrances(&document, effects.timers.as_ref());
    report("forms", interactions::wire_forms(&document, &effects));
    report("delete buttons", interactions::wire_delete_buttons(&window, &document, &effects));
    report("logo", interactions::wire_logo(&document, &effects));
    report("quote rotation", interactions::wire_quotes(&document, effects.timers.clone()));
    Ok(())
}

fn report<T: Debug>(feature: &str, result: Result<T, JsValue>) {
    match result {
        Ok(wired) => log::debug!("{}: {:?}", feature, wired),
        Err(err) => log::warn!("{} not started: {:?}", feature, err),
    }
}

/// The running particle background, shared with the frame loop and the resize listener.
pub struct Background {
    pub renderer: Rc<RefCell<CanvasRenderer>>,
    pub field: Rc<RefCell<ParticleField>>,
}

pub fn start_background(window: &Window, document: &Document, config: FieldConfig) -> Result<Background, JsValue> {
    let (width, height) = dom::viewport_size(window)?;
    let renderer = Rc::new(RefCell::new(CanvasRenderer::attach(document, width, height)?));
    let field = Rc::new(RefCell::new(ParticleField::from_entropy(
        config,
        width as f64,
        height as f64,
    )));

    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let mut frames = AnimationFrame {
        window: window.clone(),
        callback: callback.clone(),
    };

    // The loop runs for the lifetime of the page, the closure keeps itself alive
    // through the scheduler it captures
    {
        let field = field.clone();
        let renderer = renderer.clone();
        let mut frames = frames.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            field.borrow_mut().step(&mut *renderer.borrow_mut(), &mut frames);
        }) as Box<dyn FnMut()>));
    }

    {
        let _timer = Timer::new("ParticleField::start");
        field.borrow_mut().start(&mut *renderer.borrow_mut(), &mut frames);
    }

    {
        let resize_window = window.clone();
        let renderer = renderer.clone();
        let field = field.clone();
        let resize = Closure::wrap(Box::new(move || on_resize(&resize_window, &renderer, &field)) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        resize.forget();
    }

    Ok(Background { renderer, field })
}

// Canvas follows the viewport, particles stay where they are
fn on_resize(window: &Window, renderer: &RefCell<CanvasRenderer>, field: &RefCell<ParticleField>) {
    match dom::viewport_size(window) {
        Ok((width, height)) => {
            renderer.borrow_mut().resize(width, height);
            field.borrow_mut().resize(width as f64, height as f64);
        }
        Err(err) => log::warn!("viewport size unavailable: {:?}", err),
    }
}
