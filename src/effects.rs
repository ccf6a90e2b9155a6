// One-shot visual effects: toast banners, the slash sweep, and the entry
// transitions sections play on page load. Each effect schedules its own cleanup.

use crate::dom;
use crate::timers::Timers;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Severity::Success),
            "danger" | "error" => Ok(Severity::Danger),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity `{}`", other)),
        }
    }
}

pub struct Toast;

impl Toast {
    pub const STACK_ID: &'static str = "toast-stack";
    pub const FADE_AFTER_MS: u32 = 2500;
    pub const LIFETIME_MS: u32 = 3000;

    /// Appends a dismissible banner to the shared stack and schedules its removal.
    pub fn show(
        document: &Document,
        timers: &dyn Timers,
        message: &str,
        severity: Severity,
    ) -> Result<HtmlElement, JsValue> {
        let stack = Toast::stack(document)?;

        let banner = dom::create_html_element(document, "div")?;
        banner.set_class_name(&format!(
            "alert alert-{} alert-dismissible fade show",
            severity.as_str()
        ));
        banner.set_attribute("role", "alert")?;

        let text = dom::create_html_element(document, "span")?;
        text.set_text_content(Some(message));
        banner.append_child(&text)?;

        let close = dom::create_html_element(document, "button")?;
        close.set_attribute("type", "button")?;
        close.set_class_name("btn-close");
        close.set_attribute("aria-label", "Close")?;
        banner.append_child(&close)?;

        stack.append_child(&banner)?;

        let fading = banner.clone();
        timers.after(
            Toast::FADE_AFTER_MS,
            Box::new(move || {
                if let Err(err) = fading.class_list().remove_1("show") {
                    log::warn!("toast fade failed: {:?}", err);
                }
            }),
        );
        let expired = banner.clone();
        timers.after(Toast::LIFETIME_MS, Box::new(move || expired.remove()));

        Ok(banner)
    }

    fn stack(document: &Document) -> Result<HtmlElement, JsValue> {
        if let Some(existing) = document.get_element_by_id(Toast::STACK_ID) {
            return existing.dyn_into::<HtmlElement>().map_err(JsValue::from);
        }
        let stack = dom::create_html_element(document, "div")?;
        stack.set_id(Toast::STACK_ID);
        dom::set_styles(
            &stack,
            &[
                ("position", "fixed"),
                ("top", "20px"),
                ("right", "20px"),
                ("z-index", "9999"),
                ("display", "flex"),
                ("flex-direction", "column"),
                ("gap", "8px"),
            ],
        )?;
        // One listener for every close button the stack will ever hold
        let on_click = Closure::wrap(Box::new(Toast::dismiss_clicked) as Box<dyn FnMut(Event)>);
        stack.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
        dom::body(document)?.append_child(&stack)?;
        Ok(stack)
    }

    fn dismiss_clicked(event: Event) {
        let banner = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .filter(|e| e.closest(".btn-close").ok().flatten().is_some())
            .and_then(|e| e.closest(".alert").ok().flatten());
        if let Some(banner) = banner {
            banner.remove();
        }
    }
}

pub struct Slash;

impl Slash {
    pub const CLASS: &'static str = "slash-effect";
    pub const SWEEP_DELAY_MS: u32 = 10;
    pub const DURATION_MS: u32 = 300;

    /// Plays a diagonal gradient sweep across the viewport, then removes it.
    pub fn trigger(document: &Document, timers: &dyn Timers) -> Result<HtmlElement, JsValue> {
        let slash = dom::create_html_element(document, "div")?;
        slash.set_class_name(Slash::CLASS);
        dom::set_styles(
            &slash,
            &[
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("pointer-events", "none"),
                (
                    "background",
                    "linear-gradient(45deg, transparent, rgba(255, 69, 0, 0.5), transparent)",
                ),
                ("z-index", "9998"),
                ("opacity", "0"),
                ("transform", "translateX(-100%)"),
            ],
        )?;
        dom::body(document)?.append_child(&slash)?;

        let sweeping = slash.clone();
        timers.after(
            Slash::SWEEP_DELAY_MS,
            Box::new(move || {
                let result = dom::set_styles(
                    &sweeping,
                    &[
                        ("transition", "transform 0.3s ease, opacity 0.3s ease"),
                        ("transform", "translateX(100%)"),
                        ("opacity", "1"),
                    ],
                );
                if let Err(err) = result {
                    log::warn!("slash sweep failed: {:?}", err);
                }
            }),
        );
        let finished = slash.clone();
        timers.after(Slash::DURATION_MS, Box::new(move || finished.remove()));

        Ok(slash)
    }
}

/// How one group of page sections settles into place after load.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entrance {
    pub selector: &'static str,
    /// Starting vertical offset in pixels, zero for a plain fade.
    pub offset_px: i32,
    pub delay_ms: u32,
    pub transition: &'static str,
}

pub const ENTRANCES: &[Entrance] = &[
    Entrance {
        selector: "body",
        offset_px: 0,
        delay_ms: 100,
        transition: "opacity 1s ease-in-out",
    },
    Entrance {
        selector: ".alert",
        offset_px: -20,
        delay_ms: 100,
        transition: "opacity 0.5s ease, transform 0.5s ease",
    },
    Entrance {
        selector: ".welcome-message",
        offset_px: -20,
        delay_ms: 500,
        transition: "opacity 1s, transform 1s",
    },
    Entrance {
        selector: ".content",
        offset_px: 30,
        delay_ms: 700,
        transition: "opacity 1s ease-out, transform 1s ease-out",
    },
    Entrance {
        selector: ".table-dark",
        offset_px: 20,
        delay_ms: 800,
        transition: "opacity 1s ease-out, transform 1s ease-out",
    },
];

impl Entrance {
    pub fn hidden_styles(&self) -> Vec<(&'static str, String)> {
        let mut styles = vec![("opacity", "0".to_owned())];
        if self.offset_px != 0 {
            styles.push(("transform", format!("translateY({}px)", self.offset_px)));
        }
        styles
    }

    pub fn settled_styles(&self) -> Vec<(&'static str, String)> {
        let mut styles = vec![
            ("transition", self.transition.to_owned()),
            ("opacity", "1".to_owned()),
        ];
        if self.offset_px != 0 {
            styles.push(("transform", "translateY(0)".to_owned()));
        }
        styles
    }

    /// Hides every matching element now and reveals them after the delay.
    /// Returns how many elements were picked up.
    pub fn apply(&self, document: &Document, timers: &dyn Timers) -> Result<usize, JsValue> {
        let elements = dom::query_all(document, self.selector)?;
        if elements.is_empty() {
            return Ok(0);
        }
        for element in &elements {
            apply_styles(element, &self.hidden_styles())?;
        }
        let count = elements.len();
        let settled = self.settled_styles();
        let selector = self.selector;
        timers.after(
            self.delay_ms,
            Box::new(move || {
                for element in &elements {
                    if let Err(err) = apply_styles(element, &settled) {
                        log::warn!("entrance for `{}` failed: {:?}", selector, err);
                    }
                }
            }),
        );
        Ok(count)
    }
}

/// Shared handle the event handlers fire effects through. Failures are logged,
/// a missing banner or sweep never breaks the handler that asked for it.
#[derive(Clone)]
pub struct Effects {
    pub document: Document,
    pub timers: Rc<dyn Timers>,
}

impl Effects {
    pub fn new(document: Document, timers: Rc<dyn Timers>) -> Self {
        Effects { document, timers }
    }

    pub fn toast(&self, message: &str, severity: Severity) {
        if let Err(err) = Toast::show(&self.document, self.timers.as_ref(), message, severity) {
            log::warn!("toast `{}` not shown: {:?}", message, err);
        }
    }

    pub fn slash(&self) {
        if let Err(err) = Slash::trigger(&self.document, self.timers.as_ref()) {
            log::warn!("slash effect not shown: {:?}", err);
        }
    }

    /// Success toast plus the slash sweep, the pairing most actions use.
    pub fn celebrate(&self, message: &str) {
        self.toast(message, Severity::Success);
        self.slash();
    }
}

pub fn play_entrances(document: &Document, timers: &dyn Timers) {
    for entrance in ENTRANCES {
        match entrance.apply(document, timers) {
            Ok(count) => log::debug!("entrance `{}` on {} element(s)", entrance.selector, count),
            Err(err) => log::warn!("entrance `{}` skipped: {:?}", entrance.selector, err),
        }
    }
}

fn apply_styles(element: &HtmlElement, styles: &[(&'static str, String)]) -> Result<(), JsValue> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}
