use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlImageElement};

use crate::dom::{self, js_err};
use crate::page::PageShared;
use sketchpage_core::viewer::{FULL_IMAGE_STYLE, OVERLAY_STYLE};
use sketchpage_core::ViewerLatch;

const RESULT_IMAGE_SELECTOR: &str = ".result-image";

struct OpenViewer {
    overlay: Element,
    _dismiss: EventListener,
}

#[derive(Default)]
pub(crate) struct ViewerState {
    latch: ViewerLatch,
    open: Option<OpenViewer>,
}

impl ViewerState {
    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        self.latch.is_open()
    }
}

pub(crate) fn install(shared: &Rc<PageShared>) -> Vec<EventListener> {
    dom::query_all::<Element>(&shared.document, RESULT_IMAGE_SELECTOR)
        .into_iter()
        .map(|image| {
            let shared = shared.clone();
            let image_ref = image.clone();
            EventListener::new(&image, "click", move |_event| {
                open(&shared, &image_src(&image_ref));
            })
        })
        .collect()
}

fn image_src(element: &Element) -> String {
    element
        .dyn_ref::<HtmlImageElement>()
        .map(|image| image.src())
        .or_else(|| element.get_attribute("src"))
        .unwrap_or_default()
}

/// Shows `src` full screen. Returns false if a viewer is already open.
pub(crate) fn open(shared: &Rc<PageShared>, src: &str) -> bool {
    if !shared.viewer.borrow_mut().latch.try_open() {
        return false;
    }
    let overlay = match build_overlay(&shared.document, src) {
        Ok(overlay) => overlay,
        Err(err) => {
            gloo::console::warn!("image viewer failed", js_err(err));
            shared.viewer.borrow_mut().latch.close();
            return false;
        }
    };
    let weak = Rc::downgrade(shared);
    let dismiss = EventListener::new(&overlay, "click", move |_event| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        // this listener lives inside the viewer state; drop it after the dispatch
        spawn_local(async move {
            close(&shared);
        });
    });
    shared.viewer.borrow_mut().open = Some(OpenViewer {
        overlay,
        _dismiss: dismiss,
    });
    true
}

pub(crate) fn close(shared: &PageShared) {
    let open = {
        let mut state = shared.viewer.borrow_mut();
        state.latch.close();
        state.open.take()
    };
    if let Some(open) = open {
        open.overlay.remove();
    }
}

fn build_overlay(document: &Document, src: &str) -> Result<Element, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("missing body"))?;
    let overlay = document.create_element("div")?;
    overlay.set_attribute("style", OVERLAY_STYLE)?;
    let image = document
        .create_element("img")?
        .dyn_into::<HtmlImageElement>()
        .map_err(JsValue::from)?;
    image.set_src(src);
    image.set_attribute("style", FULL_IMAGE_STYLE)?;
    overlay.append_child(&image)?;
    body.append_child(&overlay)?;
    Ok(overlay)
}
