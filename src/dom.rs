use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

pub(crate) fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub(crate) fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Elements matching `selector` that also cast to `T`. An invalid selector
/// yields an empty list.
pub(crate) fn query_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let Ok(list) = document.query_selector_all(selector) else {
        gloo::console::warn!("invalid selector", selector.to_string());
        return Vec::new();
    };
    let mut out = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        if let Some(node) = list.get(index) {
            if let Ok(element) = node.dyn_into::<T>() {
                out.push(element);
            }
        }
    }
    out
}

pub(crate) fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        gloo::console::warn!("style write failed", property.to_string(), js_err(err));
    }
}

pub(crate) fn style_of(element: &HtmlElement, property: &str) -> String {
    element
        .style()
        .get_property_value(property)
        .unwrap_or_default()
}

pub(crate) fn toggle_class(element: &Element, class: &str, on: bool) {
    let classes = element.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(err) = result {
        gloo::console::warn!("class toggle failed", class.to_string(), js_err(err));
    }
}

/// Blocking browser alert.
pub(crate) fn alert(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.alert_with_message(message) {
        gloo::console::warn!("alert failed", js_err(err));
    }
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}
