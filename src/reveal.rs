use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::{self, js_err};
use crate::page::PageShared;
use sketchpage_core::page_style::{
    REVEAL_HIDDEN_OPACITY, REVEAL_HIDDEN_TRANSFORM, REVEAL_SHOWN_OPACITY, REVEAL_SHOWN_TRANSFORM,
    REVEAL_TRANSITION,
};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Fades cards in the first time they scroll into view. Targets stay
/// observed; re-entering the viewport just rewrites the same styles.
pub(crate) struct RevealWatcher {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl RevealWatcher {
    pub(crate) fn install(shared: &PageShared) -> Option<Self> {
        let settings = &shared.config.reveal;
        let targets = dom::query_all::<HtmlElement>(&shared.document, &settings.selector);
        if targets.is_empty() {
            return None;
        }
        let callback: ObserverCallback = Closure::wrap(Box::new(
            |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    if let Ok(target) = entry.target().dyn_into::<HtmlElement>() {
                        show(&target);
                    }
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(settings.threshold));
        init.set_root_margin(&settings.root_margin);
        let observer =
            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            {
                Ok(observer) => observer,
                Err(err) => {
                    // cards were never hidden, so they simply stay visible
                    gloo::console::warn!("scroll reveal disabled", js_err(err));
                    return None;
                }
            };
        for target in &targets {
            hide(target);
            observer.observe(target);
        }
        Some(Self {
            observer,
            _callback: callback,
        })
    }

    pub(crate) fn disconnect(self) {
        self.observer.disconnect();
    }
}

fn hide(target: &HtmlElement) {
    dom::set_style(target, "opacity", REVEAL_HIDDEN_OPACITY);
    dom::set_style(target, "transform", REVEAL_HIDDEN_TRANSFORM);
    dom::set_style(target, "transition", REVEAL_TRANSITION);
}

fn show(target: &HtmlElement) {
    dom::set_style(target, "opacity", REVEAL_SHOWN_OPACITY);
    dom::set_style(target, "transform", REVEAL_SHOWN_TRANSFORM);
}
