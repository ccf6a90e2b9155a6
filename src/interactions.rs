// Event wiring for the page: form submissions, delete confirmations, the logo
// easter egg, quote rotation, clipboard copy and editor formatting. The decisions
// live in small plain types so they can be checked without a browser.

use crate::dom;
use crate::effects::{Effects, Severity};
use crate::timers::Timers;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Event, HtmlButtonElement, HtmlDocument, HtmlElement, HtmlFormElement, HtmlInputElement, Window,
};

pub mod messages {
    pub const OFFER_REJECTED: &str = "Samurai, offer price must be greater than 0!";
    pub const OFFER_ACCEPTED: &str = "Offer submitted! Slash the market!";
    pub const CAPSULE_SEALED: &str = "Time Capsule sealed with Crypto Blade!";
    pub const ADMIN_REGISTERED: &str = "Forged a new Crypto Samurai Admin!";
    pub const CAPSULE_BLOCK: &str = "Block forged into the Time Capsule!";
    pub const TRANSFERRED: &str = "PUK transferred successfully!";
    pub const POSTED: &str = "Post forged in the Dojo!";
    pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this?";
    pub const DELETED: &str = "Slashed from the Dojo!";
    pub const LOGO_TEASE: &str = "PUK @ คัมภีร์สายกระบี่คริปโต - Slash the FUD!";
    pub const LOGO_MASTER: &str = "PUK @ คัมภีร์สายกระบี่คริปโต - Master of the Blockchain Dojo!";
    pub const COPIED: &str = "Address copied to clipboard, Samurai!";
    pub const COPY_FAILED: &str = "Failed to copy address. Try again!";
    pub const WELCOME: &str = "ChainLogger - Forged by PUK @ คัมภีร์สายกระบี่คริปโต";

    pub const QUOTES: &[&str] = &[
        "Slash the FUD with Crypto Blade! - PUK",
        "Ride the Blockchain, Samurai! - PUK",
        "Forge your fate in the Crypto Dojo! - PUK",
        "HODL with the heart of a warrior! - PUK",
    ];
}

// Action URL fragments and the toast each one earns
const ACTION_MESSAGES: &[(&[&str], &str)] = &[
    (&["register_admin"], messages::ADMIN_REGISTERED),
    (&["timecapsule"], messages::CAPSULE_BLOCK),
    (&["transfer"], messages::TRANSFERRED),
    (&["new_post", "post_details"], messages::POSTED),
];

/// What a form looked like at the moment it was submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormFacts<'a> {
    pub action: &'a str,
    /// Raw value of the `#offer_price` field, when the form has one.
    pub offer_price: Option<&'a str>,
    /// The time capsule editor was found and copied into its hidden input.
    pub capsule_synced: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Let it through and celebrate.
    Accepted(&'static str),
    /// Block the submission and warn.
    Rejected(&'static str),
    Ignored,
}

pub fn classify_submission(facts: &FormFacts) -> Submission {
    if let Some(raw) = facts.offer_price {
        return match raw.trim().parse::<f64>() {
            Ok(price) if price > 0.0 => Submission::Accepted(messages::OFFER_ACCEPTED),
            _ => Submission::Rejected(messages::OFFER_REJECTED),
        };
    }
    if facts.capsule_synced {
        return Submission::Accepted(messages::CAPSULE_SEALED);
    }
    ACTION_MESSAGES
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| facts.action.contains(f)))
        .map(|&(_, message)| Submission::Accepted(message))
        .unwrap_or(Submission::Ignored)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogoReward {
    Tease,
    Master,
}

#[derive(Debug, Default)]
pub struct LogoClicks {
    count: u32,
}

impl LogoClicks {
    pub const REWARD_EVERY: u32 = 3;

    pub fn click(&mut self) -> LogoReward {
        self.count += 1;
        if self.count == LogoClicks::REWARD_EVERY {
            self.count = 0;
            LogoReward::Master
        } else {
            LogoReward::Tease
        }
    }

    pub fn message(reward: LogoReward) -> &'static str {
        match reward {
            LogoReward::Tease => messages::LOGO_TEASE,
            LogoReward::Master => messages::LOGO_MASTER,
        }
    }
}

/// Cycles through a fixed list of quotes forever.
#[derive(Debug)]
pub struct QuoteRotator {
    quotes: &'static [&'static str],
    index: usize,
}

impl QuoteRotator {
    pub const PERIOD_MS: u32 = 5000;
    pub const FADE_MS: u32 = 500;

    pub fn new(quotes: &'static [&'static str]) -> Self {
        QuoteRotator { quotes, index: 0 }
    }

    pub fn next_quote(&mut self) -> Option<&'static str> {
        let quote = self.quotes.get(self.index).copied()?;
        self.index = (self.index + 1) % self.quotes.len();
        Some(quote)
    }
}

pub fn wire_forms(document: &Document, effects: &Effects) -> Result<usize, JsValue> {
    let forms = dom::query_all(document, "form")?;
    let mut wired = 0;
    for form in forms {
        let form = match form.dyn_into::<HtmlFormElement>() {
            Ok(form) => form,
            Err(_) => continue,
        };
        let effects = effects.clone();
        let target = form.clone();
        let on_submit = Closure::wrap(Box::new(move |event: Event| {
            let action = target.action();
            let offer_price = read_offer_price(&target);
            let capsule_synced = target.class_list().contains("timecapsule-form") && sync_capsule(&effects.document);
            let facts = FormFacts {
                action: &action,
                offer_price: offer_price.as_deref(),
                capsule_synced,
            };
            match classify_submission(&facts) {
                Submission::Accepted(message) => effects.celebrate(message),
                Submission::Rejected(message) => {
                    event.prevent_default();
                    effects.toast(message, Severity::Danger);
                }
                Submission::Ignored => {}
            }
        }) as Box<dyn FnMut(Event)>);
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        on_submit.forget();
        wired += 1;
    }
    Ok(wired)
}

fn read_offer_price(form: &HtmlFormElement) -> Option<String> {
    form.query_selector("#offer_price")
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

// Rich text lives in a contenteditable div, the form posts a hidden input
fn sync_capsule(document: &Document) -> bool {
    let editor = document.get_element_by_id("message-editor");
    let input = document
        .get_element_by_id("message-input")
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok());
    match (editor, input) {
        (Some(editor), Some(input)) => {
            input.set_value(&editor.inner_html());
            true
        }
        _ => false,
    }
}

pub fn wire_delete_buttons(window: &Window, document: &Document, effects: &Effects) -> Result<usize, JsValue> {
    let buttons = dom::query_all(document, ".btn-danger")?;
    let mut wired = 0;
    for button in buttons {
        let window = window.clone();
        let effects = effects.clone();
        let target = button.clone();
        let on_click = Closure::wrap(Box::new(move |event: Event| {
            if owning_form(&target).is_none() {
                return;
            }
            match window.confirm_with_message(messages::CONFIRM_DELETE) {
                Ok(true) => effects.celebrate(messages::DELETED),
                Ok(false) => event.prevent_default(),
                Err(err) => {
                    log::warn!("confirm dialog unavailable: {:?}", err);
                    event.prevent_default();
                }
            }
        }) as Box<dyn FnMut(Event)>);
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
        wired += 1;
    }
    Ok(wired)
}

/// Form a submit control belongs to, for both `<button>` and `<input>` controls.
pub fn owning_form(control: &HtmlElement) -> Option<HtmlFormElement> {
    if let Some(button) = control.dyn_ref::<HtmlButtonElement>() {
        return button.form();
    }
    if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
        return input.form();
    }
    None
}

pub fn wire_logo(document: &Document, effects: &Effects) -> Result<bool, JsValue> {
    let logo = match dom::query_one(document, ".navbar-brand")? {
        Some(logo) => logo,
        None => return Ok(false),
    };
    let clicks = Rc::new(RefCell::new(LogoClicks::default()));
    let effects = effects.clone();
    let on_click = Closure::wrap(Box::new(move || {
        let reward = clicks.borrow_mut().click();
        match reward {
            LogoReward::Master => effects.celebrate(LogoClicks::message(reward)),
            LogoReward::Tease => effects.toast(LogoClicks::message(reward), Severity::Success),
        }
    }) as Box<dyn FnMut()>);
    logo.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(true)
}

pub fn wire_quotes(document: &Document, timers: Rc<dyn Timers>) -> Result<bool, JsValue> {
    let element = match dom::query_one(document, ".quote-text")? {
        Some(element) => element,
        None => return Ok(false),
    };
    let rotator = Rc::new(RefCell::new(QuoteRotator::new(messages::QUOTES)));
    let fade_timers = timers.clone();
    timers.every(
        QuoteRotator::PERIOD_MS,
        Box::new(move || {
            set_opacity(&element, "0");
            let element = element.clone();
            let rotator = rotator.clone();
            fade_timers.after(
                QuoteRotator::FADE_MS,
                Box::new(move || {
                    if let Some(quote) = rotator.borrow_mut().next_quote() {
                        element.set_text_content(Some(quote));
                    }
                    set_opacity(&element, "1");
                }),
            );
        }),
    );
    Ok(true)
}

fn set_opacity(element: &HtmlElement, value: &str) {
    if let Err(err) = element.style().set_property("opacity", value) {
        log::warn!("opacity not set: {:?}", err);
    }
}

/// Writes `text` to the clipboard and reports the outcome with a toast.
pub fn copy_text(window: &Window, effects: &Effects, text: &str) {
    let promise = match clipboard_write(window, text) {
        Ok(promise) => promise,
        Err(err) => {
            log::warn!("clipboard unavailable: {:?}", err);
            effects.toast(messages::COPY_FAILED, Severity::Danger);
            return;
        }
    };
    let copied = effects.clone();
    let failed = effects.clone();
    let on_copied = Closure::once(move |_: JsValue| copied.celebrate(messages::COPIED));
    let on_failed = Closure::once(move |_: JsValue| failed.toast(messages::COPY_FAILED, Severity::Danger));
    let _ = promise.then2(&on_copied, &on_failed);
    // Exactly one of the two runs, once, after this function returns
    on_copied.forget();
    on_failed.forget();
}

// navigator.clipboard is reached through Reflect so web-sys unstable APIs stay off
fn clipboard_write(window: &Window, text: &str) -> Result<js_sys::Promise, JsValue> {
    let clipboard = js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(JsValue::from_str("navigator.clipboard missing"));
    }
    let write_text = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))?
        .dyn_into::<js_sys::Function>()?;
    write_text
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into::<js_sys::Promise>()
}

/// Runs an editing command on the rich text editor and gives it focus back.
pub fn format_text(document: &Document, command: &str, value: Option<&str>) -> Result<(), JsValue> {
    let html = document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| JsValue::from_str("not an html document"))?;
    match value {
        Some(value) => html.exec_command_with_show_ui_and_value(command, false, value)?,
        None => html.exec_command(command)?,
    };
    if let Some(editor) = dom::query_one(document, "#message-editor")? {
        editor.focus()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(action: &str) -> FormFacts<'_> {
        FormFacts {
            action,
            ..FormFacts::default()
        }
    }

    #[test]
    fn offer_price_must_be_positive() {
        let mut f = facts("/buy_block/3");
        for bad in &["0", "-4", "", "   ", "abc"] {
            f.offer_price = Some(*bad);
            assert_eq!(classify_submission(&f), Submission::Rejected(messages::OFFER_REJECTED));
        }
        f.offer_price = Some(" 0.5 ");
        assert_eq!(classify_submission(&f), Submission::Accepted(messages::OFFER_ACCEPTED));
    }

    #[test]
    fn offer_check_wins_over_action_routing() {
        let f = FormFacts {
            action: "/transfer",
            offer_price: Some("0"),
            capsule_synced: false,
        };
        assert_eq!(classify_submission(&f), Submission::Rejected(messages::OFFER_REJECTED));
    }

    #[test]
    fn synced_capsule_gets_sealed_message() {
        let f = FormFacts {
            action: "http://localhost/timecapsule",
            offer_price: None,
            capsule_synced: true,
        };
        assert_eq!(classify_submission(&f), Submission::Accepted(messages::CAPSULE_SEALED));
    }

    #[test]
    fn routes_by_action_fragment() {
        assert_eq!(
            classify_submission(&facts("http://h/register_admin")),
            Submission::Accepted(messages::ADMIN_REGISTERED)
        );
        assert_eq!(
            classify_submission(&facts("http://h/timecapsule")),
            Submission::Accepted(messages::CAPSULE_BLOCK)
        );
        assert_eq!(classify_submission(&facts("/transfer")), Submission::Accepted(messages::TRANSFERRED));
        assert_eq!(classify_submission(&facts("/new_post")), Submission::Accepted(messages::POSTED));
        assert_eq!(classify_submission(&facts("/post_details/9")), Submission::Accepted(messages::POSTED));
        assert_eq!(classify_submission(&facts("/login")), Submission::Ignored);
        assert_eq!(classify_submission(&facts("")), Submission::Ignored);
    }

    #[test]
    fn every_third_logo_click_is_the_master_reward() {
        let mut clicks = LogoClicks::default();
        let rewards: Vec<_> = (0..7).map(|_| clicks.click()).collect();
        assert_eq!(
            rewards,
            vec![
                LogoReward::Tease,
                LogoReward::Tease,
                LogoReward::Master,
                LogoReward::Tease,
                LogoReward::Tease,
                LogoReward::Master,
                LogoReward::Tease,
            ]
        );
    }

    #[test]
    fn quotes_wrap_around() {
        let mut rotator = QuoteRotator::new(messages::QUOTES);
        let seen: Vec<_> = (0..6).filter_map(|_| rotator.next_quote()).collect();
        assert_eq!(seen[..4], messages::QUOTES[..]);
        assert_eq!(seen[4], messages::QUOTES[0]);
        assert_eq!(seen[5], messages::QUOTES[1]);
    }

    #[test]
    fn empty_quote_list_yields_nothing() {
        let mut rotator = QuoteRotator::new(&[]);
        assert_eq!(rotator.next_quote(), None);
    }
}
