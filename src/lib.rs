pub mod app;
pub mod color;
pub mod config;
pub mod dom;
pub mod effects;
pub mod field;
pub mod interactions;
pub mod particle;
pub mod renderer;
pub mod timers;
pub mod utils;

use config::FieldConfig;
use effects::Severity;
use log::LevelFilter;
use wasm_bindgen::prelude::*;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    utils::ConsoleLogger::init(LevelFilter::Info);
}

// Called by the page once the DOM is ready
#[wasm_bindgen]
pub fn run() -> Result<(), JsValue> {
    initialize();
    app::run(FieldConfig::default())
}

#[wasm_bindgen]
pub fn run_with_particles(particle_count: u32) -> Result<(), JsValue> {
    initialize();
    app::run(FieldConfig {
        particle_count: particle_count as usize,
        ..FieldConfig::default()
    })
}

// The helpers below stay callable from inline handlers in the page templates

#[wasm_bindgen]
pub fn show_toast(message: &str, severity: Option<String>) -> Result<(), JsValue> {
    let severity = match severity {
        None => Severity::Success,
        Some(tag) => tag.parse().unwrap_or_else(|err| {
            log::warn!("{}, showing as info", err);
            Severity::Info
        }),
    };
    let (_, effects) = app::page_effects()?;
    effects::Toast::show(&effects.document, effects.timers.as_ref(), message, severity)?;
    Ok(())
}

#[wasm_bindgen]
pub fn trigger_slash_effect() -> Result<(), JsValue> {
    let (_, effects) = app::page_effects()?;
    effects::Slash::trigger(&effects.document, effects.timers.as_ref())?;
    Ok(())
}

#[wasm_bindgen]
pub fn copy_to_clipboard(text: &str) -> Result<(), JsValue> {
    let (window, effects) = app::page_effects()?;
    interactions::copy_text(&window, &effects, text);
    Ok(())
}

#[wasm_bindgen]
pub fn format_text(command: &str, value: Option<String>) -> Result<(), JsValue> {
    let (_, effects) = app::page_effects()?;
    interactions::format_text(&effects.document, command, value.as_deref())
}
