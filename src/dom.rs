// Helper functions for the DOM lookups and style writes the effects keep repeating

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global `window`"))
}

pub fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

pub fn body(document: &Document) -> Result<HtmlElement, JsValue> {
    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))
}

pub fn viewport_size(window: &Window) -> Result<(u32, u32), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width as u32, height as u32))
}

pub fn create_html_element(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document.create_element(tag)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

// Every element matching `selector` that is an HtmlElement, in document order
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    let mut elements = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        if let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            elements.push(element);
        }
    }
    Ok(elements)
}

pub fn query_one(document: &Document, selector: &str) -> Result<Option<HtmlElement>, JsValue> {
    Ok(document
        .query_selector(selector)?
        .and_then(|e| e.dyn_into::<HtmlElement>().ok()))
}

pub fn set_styles(element: &Element, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let element = element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| JsValue::from_str("element has no inline style"))?;
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}
