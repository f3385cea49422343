use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, Element, Event, File, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::dom;
use crate::effects;
use crate::page::PageShared;
use sketchpage_core::page_style::LOADING_OVERLAY_DISPLAY;
use sketchpage_core::{
    check_submission, FileCandidate, PreviewTicket, UploadError, UploadSession, UploadView,
};

const DRAGOVER_CLASS: &str = "dragover";

/// The upload widget: hidden file input, drop target, preview panel and the
/// form that posts the file.
pub(crate) struct UploadIntake {
    input: HtmlInputElement,
    area: HtmlElement,
    placeholder: Option<HtmlElement>,
    preview: Option<HtmlElement>,
    image: Option<HtmlImageElement>,
    name_label: Option<Element>,
    remove: Option<Element>,
    form: Option<Element>,
    overlay: Option<HtmlElement>,
    session: RefCell<UploadSession>,
    detached: Cell<bool>,
}

impl UploadIntake {
    pub(crate) fn locate(shared: &PageShared) -> Option<Rc<Self>> {
        let document = &shared.document;
        let ids = &shared.config.upload;
        let input = dom::by_id::<HtmlInputElement>(document, &ids.file_input)?;
        let area = dom::by_id::<HtmlElement>(document, &ids.upload_area)?;
        Some(Rc::new(Self {
            input,
            area,
            placeholder: dom::by_id(document, &ids.placeholder),
            preview: dom::by_id(document, &ids.preview),
            image: dom::by_id(document, &ids.preview_image),
            name_label: dom::by_id(document, &ids.file_name),
            remove: dom::by_id(document, &ids.remove_button),
            form: dom::by_id(document, &ids.form),
            overlay: dom::by_id(document, &ids.loading_overlay),
            session: RefCell::new(UploadSession::new(shared.config.max_upload_bytes)),
            detached: Cell::new(false),
        }))
    }

    pub(crate) fn overlay(&self) -> Option<&HtmlElement> {
        self.overlay.as_ref()
    }

    pub(crate) fn overlay_visible(&self) -> bool {
        self.overlay
            .as_ref()
            .map(|overlay| dom::style_of(overlay, "display") == LOADING_OVERLAY_DISPLAY)
            .unwrap_or(false)
    }

    pub(crate) fn select_candidate(
        &self,
        candidate: FileCandidate,
    ) -> Result<PreviewTicket, UploadError> {
        self.session.borrow_mut().select(candidate)
    }

    /// Stops rendering reads that finish after the page was torn down.
    pub(crate) fn detach(&self) {
        self.detached.set(true);
    }

    /// Renders a finished read if it still belongs to the latest selection.
    pub(crate) fn finish_read(&self, ticket: PreviewTicket, bytes: Vec<u8>) -> bool {
        if self.detached.get() {
            return false;
        }
        let view = self.session.borrow_mut().complete(ticket, bytes);
        let Some(view) = view else {
            return false;
        };
        self.render(&view);
        true
    }

    pub(crate) fn reset(&self) {
        self.input.set_value("");
        let view = self.session.borrow_mut().clear();
        self.render(&view);
    }

    fn render(&self, view: &UploadView) {
        if let Some(placeholder) = self.placeholder.as_ref() {
            dom::set_style(placeholder, "display", view.placeholder_display());
        }
        if let Some(preview) = self.preview.as_ref() {
            dom::set_style(preview, "display", view.preview_display());
        }
        if let Some(image) = self.image.as_ref() {
            image.set_src(view.image_src());
        }
        if let Some(label) = self.name_label.as_ref() {
            label.set_text_content(Some(view.file_name()));
        }
    }

    fn handle_file(self: &Rc<Self>, file: File) {
        let candidate = FileCandidate::new(file.name(), file.type_(), file.size() as u64);
        let ticket = match self.select_candidate(candidate) {
            Ok(ticket) => ticket,
            Err(err) => {
                dom::alert(&err.to_string());
                self.reset();
                return;
            }
        };
        let intake = self.clone();
        spawn_local(async move {
            match read_file_bytes(file).await {
                Ok(bytes) => {
                    intake.finish_read(ticket, bytes);
                }
                Err(err) => gloo::console::warn!("preview read failed", err),
            }
        });
    }

    fn selected_file_count(&self) -> u32 {
        self.input.files().map(|files| files.length()).unwrap_or(0)
    }

    fn handle_submit(&self, shared: &Rc<PageShared>, event: &Event) {
        if let Err(err) = check_submission(self.selected_file_count()) {
            event.prevent_default();
            dom::alert(&err.to_string());
            return;
        }
        if let Some(overlay) = self.overlay.as_ref() {
            dom::set_style(overlay, "display", LOADING_OVERLAY_DISPLAY);
            effects::start_progress(shared, Some(overlay));
        }
    }
}

async fn read_file_bytes(file: File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| "failed to read file".to_string())?;
    let array = js_sys::Uint8Array::new(&buffer);
    Ok(array.to_vec())
}

fn stop(event: &Event) {
    event.prevent_default();
    event.stop_propagation();
}

pub(crate) fn install(shared: &Rc<PageShared>, intake: &Rc<UploadIntake>) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let area = &intake.area;

    {
        let input = intake.input.clone();
        listeners.push(EventListener::new(area, "click", move |_event| {
            input.click();
        }));
        // the input sits inside the drop target; its click must not bubble
        // back into the listener above while that listener is still running
        listeners.push(EventListener::new(&intake.input, "click", |event| {
            event.stop_propagation();
        }));
    }
    {
        let intake_ref = intake.clone();
        listeners.push(EventListener::new(&intake.input, "change", move |_event| {
            let file = intake_ref.input.files().and_then(|files| files.get(0));
            if let Some(file) = file {
                intake_ref.handle_file(file);
            }
        }));
    }
    {
        let area_ref = area.clone();
        listeners.push(EventListener::new_with_options(
            area,
            "dragover",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                stop(event);
                dom::toggle_class(&area_ref, DRAGOVER_CLASS, true);
            },
        ));
    }
    {
        let area_ref = area.clone();
        listeners.push(EventListener::new_with_options(
            area,
            "dragleave",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                stop(event);
                dom::toggle_class(&area_ref, DRAGOVER_CLASS, false);
            },
        ));
    }
    {
        let intake_ref = intake.clone();
        listeners.push(EventListener::new_with_options(
            area,
            "drop",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                stop(event);
                dom::toggle_class(&intake_ref.area, DRAGOVER_CLASS, false);
                let Some(files) = event
                    .dyn_ref::<DragEvent>()
                    .and_then(|drag| drag.data_transfer())
                    .and_then(|transfer| transfer.files())
                else {
                    return;
                };
                if files.length() == 0 {
                    return;
                }
                intake_ref.input.set_files(Some(&files));
                if let Some(file) = files.get(0) {
                    intake_ref.handle_file(file);
                }
            },
        ));
    }
    if let Some(remove) = intake.remove.as_ref() {
        let intake_ref = intake.clone();
        listeners.push(EventListener::new(remove, "click", move |event| {
            // the drop target would reopen the picker
            event.stop_propagation();
            intake_ref.reset();
        }));
    }
    if let Some(form) = intake.form.as_ref() {
        let intake_ref = intake.clone();
        let shared = shared.clone();
        listeners.push(EventListener::new_with_options(
            form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| intake_ref.handle_submit(&shared, event),
        ));
    }
    listeners
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use gloo::timers::future::TimeoutFuture;
    use js_sys::{Array, Function, Reflect};
    use sketchpage_core::PageConfig;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;
    use web_sys::{DataTransfer, EventInit, FilePropertyBag};

    wasm_bindgen_test_configure!(run_in_browser);

    const ALERT_LOG: &str = "__sketchAlerts";

    struct Fixture {
        root: Element,
        shared: Rc<PageShared>,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            self.shared.timers.cancel_all();
            self.root.remove();
        }
    }

    /// Swaps `window.alert` for a recorder so handlers never block.
    struct AlertRecorder {
        window: web_sys::Window,
        original: JsValue,
    }

    impl AlertRecorder {
        fn install() -> Self {
            let window = web_sys::window().expect("window");
            let original = Reflect::get(&window, &JsValue::from_str("alert")).expect("alert");
            let recorder = Function::new_with_args(
                "message",
                "window.__sketchAlerts.push(String(message));",
            );
            Reflect::set(&window, &JsValue::from_str(ALERT_LOG), &Array::new()).expect("log");
            Reflect::set(&window, &JsValue::from_str("alert"), &recorder).expect("stub");
            Self { window, original }
        }

        fn messages(&self) -> Vec<String> {
            let log = Reflect::get(&self.window, &JsValue::from_str(ALERT_LOG)).expect("log");
            Array::from(&log)
                .iter()
                .filter_map(|value| value.as_string())
                .collect()
        }
    }

    impl Drop for AlertRecorder {
        fn drop(&mut self) {
            let _ = Reflect::set(&self.window, &JsValue::from_str("alert"), &self.original);
        }
    }

    fn child(document: &web_sys::Document, parent: &Element, tag: &str, id: &str) -> Element {
        let element = document.create_element(tag).expect("create element");
        if !id.is_empty() {
            element.set_id(id);
        }
        parent.append_child(&element).expect("append");
        element
    }

    fn fixture() -> Fixture {
        let document = dom::document().expect("document available");
        let body = document.body().expect("body");
        let root = document.create_element("div").expect("create root");
        body.append_child(&root).expect("append root");
        let form = child(&document, &root, "form", "uploadForm");
        let area = child(&document, &form, "div", "uploadArea");
        let input = child(&document, &area, "input", "fileInput");
        input.set_attribute("type", "file").expect("input type");
        child(&document, &area, "div", "uploadPlaceholder");
        let preview = child(&document, &area, "div", "uploadPreview");
        child(&document, &preview, "img", "previewImage");
        child(&document, &preview, "span", "fileName");
        child(&document, &preview, "button", "removeFile");
        let overlay = child(&document, &root, "div", "loadingOverlay");
        overlay.set_attribute("style", "display: none").expect("overlay style");
        let bar = child(&document, &overlay, "div", "");
        bar.set_class_name("progress-bar");
        let shared = PageShared::new(PageConfig::default(), document);
        Fixture { root, shared }
    }

    fn image_file(name: &str, mime: &str, bytes: &[u8]) -> File {
        let parts = Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = FilePropertyBag::new();
        options.set_type(mime);
        File::new_with_u8_array_sequence_and_options(&parts, name, &options).expect("file")
    }

    fn attach(input: &HtmlInputElement, file: &File) {
        let transfer = DataTransfer::new().expect("data transfer");
        transfer.items().add_with_file(file).expect("add file");
        input.set_files(transfer.files().as_ref());
    }

    fn submit(form: &Element) -> Event {
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event = Event::new_with_event_init_dict("submit", &init).expect("event");
        form.dispatch_event(&event).expect("dispatch");
        event
    }

    fn display(document: &web_sys::Document, id: &str) -> String {
        let element: HtmlElement = dom::by_id(document, id).expect("element");
        dom::style_of(&element, "display")
    }

    fn label_text(document: &web_sys::Document) -> String {
        let label: Element = dom::by_id(document, "fileName").expect("label");
        label.text_content().unwrap_or_default()
    }

    fn assert_empty_state(document: &web_sys::Document) {
        let input: HtmlInputElement = dom::by_id(document, "fileInput").expect("input");
        let image: HtmlImageElement = dom::by_id(document, "previewImage").expect("image");
        assert_eq!(input.value(), "");
        assert_eq!(display(document, "uploadPlaceholder"), "block");
        assert_eq!(display(document, "uploadPreview"), "none");
        assert!(image.get_attribute("src").unwrap_or_default().is_empty());
        assert_eq!(label_text(document), "");
    }

    #[wasm_bindgen_test]
    fn preview_then_reset() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let ticket = intake
            .select_candidate(FileCandidate::new("cat photo.png", "image/png", 4))
            .expect("accepted");
        assert!(intake.finish_read(ticket, vec![0x89, b'P', b'N', b'G']));

        let image: HtmlImageElement = dom::by_id(document, "previewImage").expect("image");
        assert_eq!(image.src(), "data:image/png;base64,iVBORw==");
        assert_eq!(label_text(document), "cat photo.png");
        assert_eq!(display(document, "uploadPlaceholder"), "none");
        assert_eq!(display(document, "uploadPreview"), "block");

        intake.reset();
        assert_empty_state(document);
        intake.reset();
        assert_empty_state(document);
    }

    #[wasm_bindgen_test]
    fn superseded_read_is_not_rendered() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let first = intake
            .select_candidate(FileCandidate::new("first.png", "image/png", 1))
            .expect("accepted");
        let second = intake
            .select_candidate(FileCandidate::new("second.png", "image/png", 1))
            .expect("accepted");
        assert!(!intake.finish_read(first, vec![1]));
        assert_eq!(label_text(document), "");
        assert!(intake.finish_read(second, vec![2]));
        assert_eq!(label_text(document), "second.png");
    }

    #[wasm_bindgen_test]
    fn read_after_detach_is_not_rendered() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let ticket = intake
            .select_candidate(FileCandidate::new("late.png", "image/png", 1))
            .expect("accepted");
        intake.detach();
        assert!(!intake.finish_read(ticket, vec![1]));
        assert_eq!(label_text(document), "");
    }

    #[wasm_bindgen_test]
    fn rejected_file_alerts_and_returns_to_empty() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let alerts = AlertRecorder::install();
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let ticket = intake
            .select_candidate(FileCandidate::new("keep.png", "image/png", 1))
            .expect("accepted");
        intake.finish_read(ticket, vec![1]);
        assert_eq!(label_text(document), "keep.png");

        intake.handle_file(image_file("anim.gif", "image/gif", &[1, 2, 3]));

        assert_eq!(
            alerts.messages(),
            vec![UploadError::InvalidType.to_string()]
        );
        assert_empty_state(document);
        assert!(!intake.session.borrow().has_selection());
    }

    #[wasm_bindgen_test]
    async fn accepted_file_is_previewed_after_read() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");

        intake.handle_file(image_file("tiny.png", "image/png", &[0x89, b'P', b'N', b'G']));
        for _ in 0..50 {
            if !label_text(document).is_empty() {
                break;
            }
            TimeoutFuture::new(10).await;
        }

        let image: HtmlImageElement = dom::by_id(document, "previewImage").expect("image");
        assert_eq!(label_text(document), "tiny.png");
        assert_eq!(image.src(), "data:image/png;base64,iVBORw==");
        assert_eq!(display(document, "uploadPreview"), "block");
    }

    #[wasm_bindgen_test]
    fn submit_without_file_is_blocked() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let alerts = AlertRecorder::install();
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let _listeners = install(&fixture.shared, &intake);

        let form: Element = dom::by_id(document, "uploadForm").expect("form");
        let event = submit(&form);

        assert!(event.default_prevented());
        assert_eq!(alerts.messages(), vec!["Please select an image file".to_string()]);
        assert_eq!(display(document, "loadingOverlay"), "none");
        assert!(!fixture.shared.timers.progress_running());
    }

    #[wasm_bindgen_test]
    fn submit_with_file_shows_overlay_and_progress() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let alerts = AlertRecorder::install();
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let _listeners = install(&fixture.shared, &intake);
        attach(&intake.input, &image_file("a.png", "image/png", &[1]));

        let form: Element = dom::by_id(document, "uploadForm").expect("form");
        let event = submit(&form);

        assert!(!event.default_prevented());
        assert!(alerts.messages().is_empty());
        assert_eq!(display(document, "loadingOverlay"), "flex");
        assert!(fixture.shared.timers.progress_running());
    }

    #[wasm_bindgen_test]
    fn area_click_reaches_picker_once() {
        let fixture = fixture();
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let _listeners = install(&fixture.shared, &intake);

        let area_clicks = Rc::new(Cell::new(0u32));
        let input_clicks = Rc::new(Cell::new(0u32));
        let area_counter = area_clicks.clone();
        let input_counter = input_clicks.clone();
        let _area_count = EventListener::new(&intake.area, "click", move |_| {
            area_counter.set(area_counter.get() + 1);
        });
        let _input_count = EventListener::new(&intake.input, "click", move |_| {
            input_counter.set(input_counter.get() + 1);
        });

        intake.area.click();

        assert_eq!(input_clicks.get(), 1);
        assert_eq!(area_clicks.get(), 1);
    }

    #[wasm_bindgen_test]
    fn remove_click_resets_without_reaching_drop_target() {
        let fixture = fixture();
        let document = &fixture.shared.document;
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let _listeners = install(&fixture.shared, &intake);

        let ticket = intake
            .select_candidate(FileCandidate::new("a.webp", "image/webp", 1))
            .expect("accepted");
        intake.finish_read(ticket, vec![7]);

        let area_clicks = Rc::new(Cell::new(0u32));
        let counter = area_clicks.clone();
        let _area_count = EventListener::new(&intake.area, "click", move |_| {
            counter.set(counter.get() + 1);
        });
        let remove: HtmlElement = dom::by_id(document, "removeFile").expect("remove");
        remove.click();

        assert_eq!(area_clicks.get(), 0);
        assert_empty_state(document);
    }

    #[wasm_bindgen_test]
    fn drag_feedback_toggles_class() {
        let fixture = fixture();
        let intake = UploadIntake::locate(&fixture.shared).expect("intake");
        let _listeners = install(&fixture.shared, &intake);

        let over = Event::new("dragover").expect("event");
        intake.area.dispatch_event(&over).expect("dispatch");
        assert!(intake.area.class_list().contains(DRAGOVER_CLASS));

        let leave = Event::new("dragleave").expect("event");
        intake.area.dispatch_event(&leave).expect("dispatch");
        assert!(!intake.area.class_list().contains(DRAGOVER_CLASS));
    }
}
