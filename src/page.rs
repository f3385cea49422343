use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::boot;
use crate::dom;
use crate::effects;
use crate::reveal::RevealWatcher;
use crate::timers::PageTimers;
use crate::upload::{self, UploadIntake};
use crate::viewer::{self, ViewerState};
use sketchpage_core::{KeySequenceBuffer, PageConfig};

thread_local! {
    static CONTROLLER: RefCell<Option<PageController>> = RefCell::new(None);
}

/// State reachable from event callbacks. Holds no listeners, so callbacks
/// can keep an `Rc` to it without forming a cycle with the controller.
pub(crate) struct PageShared {
    pub(crate) config: PageConfig,
    pub(crate) document: Document,
    pub(crate) timers: PageTimers,
    pub(crate) keys: RefCell<KeySequenceBuffer>,
    pub(crate) viewer: RefCell<ViewerState>,
}

impl PageShared {
    pub(crate) fn new(config: PageConfig, document: Document) -> Rc<Self> {
        Rc::new(Self {
            config,
            document,
            timers: PageTimers::default(),
            keys: RefCell::new(KeySequenceBuffer::new()),
            viewer: RefCell::new(ViewerState::default()),
        })
    }
}

pub(crate) struct PageController {
    shared: Rc<PageShared>,
    upload: Option<Rc<UploadIntake>>,
    listeners: Vec<EventListener>,
    reveal: Option<RevealWatcher>,
    keyframes: Option<Element>,
    torn_down: bool,
}

impl PageController {
    pub(crate) fn install(config: PageConfig) -> Result<Self, String> {
        let document = dom::document().ok_or_else(|| "missing document".to_string())?;
        let shared = PageShared::new(config, document);
        let mut listeners = Vec::new();

        listeners.extend(effects::install_navbar(&shared));
        let upload = UploadIntake::locate(&shared);
        if let Some(intake) = upload.as_ref() {
            listeners.extend(upload::install(&shared, intake));
        }
        listeners.extend(effects::install_anchor_scroll(&shared));
        let reveal = RevealWatcher::install(&shared);
        effects::schedule_alert_dismissal(&shared);
        listeners.extend(viewer::install(&shared));
        if let Some(intake) = upload.as_ref() {
            if intake.overlay_visible() {
                effects::start_progress(&shared, intake.overlay());
            }
        }
        listeners.extend(effects::install_submit_guard(&shared));
        listeners.push(effects::install_konami(&shared));
        let keyframes = effects::inject_rainbow_keyframes(&shared.document);
        effects::apply_lazy_loading(&shared);
        effects::print_console_banner();

        gloo::console::log!("page controller installed", listeners.len() as u32);
        Ok(Self {
            shared,
            upload,
            listeners,
            reveal,
            keyframes,
            torn_down: false,
        })
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Rc<PageShared> {
        &self.shared
    }

    #[cfg(test)]
    pub(crate) fn upload(&self) -> Option<&Rc<UploadIntake>> {
        self.upload.as_ref()
    }

    /// Detaches every listener and cancels every timer this controller
    /// created. Safe to call more than once.
    pub(crate) fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.listeners.clear();
        if let Some(intake) = self.upload.as_ref() {
            intake.detach();
        }
        if let Some(reveal) = self.reveal.take() {
            reveal.disconnect();
        }
        self.shared.timers.cancel_all();
        viewer::close(&self.shared);
        if let Some(style) = self.keyframes.take() {
            style.remove();
        }
        gloo::console::log!("page controller torn down");
    }
}

impl Drop for PageController {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub(crate) fn mount() {
    let config = boot::load_page_config();
    match PageController::install(config) {
        Ok(controller) => {
            let previous = CONTROLLER.with(|slot| slot.borrow_mut().replace(controller));
            drop(previous);
        }
        Err(err) => gloo::console::warn!("page controller not installed", err),
    }
}

pub(crate) fn mount_when_ready() {
    let Some(document) = dom::document() else {
        gloo::console::warn!("page controller not installed", "missing document");
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| mount()).forget();
    } else {
        mount();
    }
}

/// Tears the page controller down, e.g. before a client-side navigation.
#[wasm_bindgen(js_name = sketchpageTeardown)]
pub fn unmount() {
    let controller = CONTROLLER.with(|slot| slot.borrow_mut().take());
    drop(controller);
}
