use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use js_sys::{Array, Function, Math, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlScriptElement,
    KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::dom::{self, js_err};
use crate::page::PageShared;
use crate::timers::TimerSlot;
use sketchpage_core::page_style::{anchor_target_selector, navbar_background};
use sketchpage_core::{FakeProgress, RAINBOW_ANIMATION, RAINBOW_KEYFRAMES};

pub(crate) fn install_navbar(shared: &Rc<PageShared>) -> Option<EventListener> {
    let window = web_sys::window()?;
    let navbar = shared
        .document
        .query_selector(".navbar")
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    let threshold = shared.config.navbar_threshold_px;
    let window_ref = window.clone();
    Some(EventListener::new(&window, "scroll", move |_event| {
        let offset = window_ref.scroll_y().unwrap_or(0.0);
        dom::set_style(&navbar, "background", navbar_background(offset, threshold));
    }))
}

pub(crate) fn install_anchor_scroll(shared: &Rc<PageShared>) -> Vec<EventListener> {
    let anchors = dom::query_all::<Element>(&shared.document, "a[href^=\"#\"]");
    anchors
        .into_iter()
        .map(|anchor| {
            let document = shared.document.clone();
            let anchor_ref = anchor.clone();
            EventListener::new_with_options(
                &anchor,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    let href = anchor_ref.get_attribute("href").unwrap_or_default();
                    scroll_to_fragment(&document, &href);
                },
            )
        })
        .collect()
}

fn scroll_to_fragment(document: &Document, href: &str) {
    let Some(selector) = anchor_target_selector(href) else {
        return;
    };
    let Ok(Some(target)) = document.query_selector(selector) else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

pub(crate) fn schedule_alert_dismissal(shared: &Rc<PageShared>) {
    let alerts = dom::query_all::<Element>(&shared.document, ".alert");
    for (index, alert) in alerts.into_iter().enumerate() {
        shared
            .timers
            .arm(TimerSlot::AlertDismiss(index), shared.config.alert_dismiss_ms, move || {
                dismiss_alert(&alert);
            });
    }
}

fn dismiss_alert(alert: &Element) {
    if let Err(err) = close_with_toolkit(alert) {
        gloo::console::warn!("alert toolkit unavailable, removing alert", js_err(err));
        alert.remove();
    }
}

/// `new bootstrap.Alert(element).close()`
fn close_with_toolkit(alert: &Element) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let toolkit = Reflect::get(&window, &JsValue::from_str("bootstrap"))?;
    if toolkit.is_null() || toolkit.is_undefined() {
        return Err(JsValue::from_str("bootstrap missing"));
    }
    let ctor = Reflect::get(&toolkit, &JsValue::from_str("Alert"))?.dyn_into::<Function>()?;
    let instance = Reflect::construct(&ctor, &Array::of1(alert))?;
    let close = Reflect::get(&instance, &JsValue::from_str("close"))?.dyn_into::<Function>()?;
    close.call0(&instance)?;
    Ok(())
}

/// Starts the loading bar inside `overlay`. A second call while the bar is
/// already running is ignored.
pub(crate) fn start_progress(shared: &Rc<PageShared>, overlay: Option<&HtmlElement>) {
    if shared.timers.progress_running() {
        return;
    }
    let Some(overlay) = overlay else {
        return;
    };
    let Some(bar) = overlay
        .query_selector(".progress-bar")
        .ok()
        .flatten()
        .and_then(|bar| bar.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let mut progress = FakeProgress::new();
    let interval = Interval::new(shared.config.progress_tick_ms, move || {
        progress.advance(Math::random());
        dom::set_style(&bar, "width", &progress.width_style());
    });
    shared.timers.start_progress(interval);
}

pub(crate) fn install_submit_guard(shared: &Rc<PageShared>) -> Vec<EventListener> {
    let forms = dom::query_all::<Element>(&shared.document, "form");
    forms
        .into_iter()
        .enumerate()
        .map(|(index, form)| {
            let shared = shared.clone();
            let form_ref = form.clone();
            EventListener::new(&form, "submit", move |_event| {
                let Some(button) = form_ref
                    .query_selector("button[type=\"submit\"]")
                    .ok()
                    .flatten()
                    .and_then(|button| button.dyn_into::<HtmlButtonElement>().ok())
                else {
                    return;
                };
                button.set_disabled(true);
                shared.timers.arm(
                    TimerSlot::SubmitGuard(index),
                    shared.config.submit_guard_ms,
                    move || button.set_disabled(false),
                );
            })
        })
        .collect()
}

pub(crate) fn install_konami(shared: &Rc<PageShared>) -> EventListener {
    let shared_ref = shared.clone();
    EventListener::new(&shared.document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let matched = shared_ref.keys.borrow_mut().push(&event.key());
        if matched {
            start_rainbow(&shared_ref);
        }
    })
}

fn start_rainbow(shared: &PageShared) {
    let Some(body) = shared.document.body() else {
        return;
    };
    dom::set_style(&body, "animation", RAINBOW_ANIMATION);
    shared
        .timers
        .arm(TimerSlot::Rainbow, shared.config.rainbow_ms, move || {
            dom::set_style(&body, "animation", "");
        });
}

pub(crate) fn inject_rainbow_keyframes(document: &Document) -> Option<Element> {
    let head = document.head()?;
    let style = document.create_element("style").ok()?;
    style.set_text_content(Some(RAINBOW_KEYFRAMES));
    if let Err(err) = head.append_child(&style) {
        gloo::console::warn!("keyframes not injected", js_err(err));
        return None;
    }
    Some(style)
}

pub(crate) fn apply_lazy_loading(shared: &Rc<PageShared>) {
    if supports_native_lazy() {
        // only images that carry data-src; a missing one must not blank src
        copy_lazy_sources(&shared.document);
    } else {
        inject_lazy_fallback(&shared.document, &shared.config.lazy_fallback_src);
    }
}

/// `'loading' in HTMLImageElement.prototype`
fn supports_native_lazy() -> bool {
    let probe = || -> Result<bool, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let ctor = Reflect::get(&window, &JsValue::from_str("HTMLImageElement"))?;
        let proto = Reflect::get(&ctor, &JsValue::from_str("prototype"))?;
        Reflect::has(&proto, &JsValue::from_str("loading"))
    };
    probe().unwrap_or(false)
}

fn copy_lazy_sources(document: &Document) -> usize {
    let images = dom::query_all::<HtmlImageElement>(document, "img[loading=\"lazy\"]");
    let mut copied = 0;
    for image in images {
        if let Some(src) = image.dataset().get("src") {
            image.set_src(&src);
            copied += 1;
        }
    }
    copied
}

fn inject_lazy_fallback(document: &Document, src: &str) {
    let Some(body) = document.body() else {
        return;
    };
    let script = match document
        .create_element("script")
        .and_then(|element| element.dyn_into::<HtmlScriptElement>().map_err(JsValue::from))
    {
        Ok(script) => script,
        Err(err) => {
            gloo::console::warn!("lazy-load fallback not injected", js_err(err));
            return;
        }
    };
    script.set_src(src);
    if let Err(err) = body.append_child(&script) {
        gloo::console::warn!("lazy-load fallback not injected", js_err(err));
    }
}

pub(crate) fn print_console_banner() {
    gloo::console::log!(
        "%c🎨 SketchAI - AI-Powered Image to Pencil Sketch",
        "color: #60a5fa; font-size: 20px; font-weight: bold;"
    );
    gloo::console::log!(
        "%cBuilt with ❤️ using Flask + OpenCV + Bootstrap",
        "color: #a78bfa; font-size: 14px;"
    );
    gloo::console::log!(
        "%cInterested in how it works? Check out /how-it-works",
        "color: #64748b; font-size: 12px;"
    );
}
