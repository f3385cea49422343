use js_sys::Reflect;
use wasm_bindgen::JsValue;

use crate::dom::js_err;
use sketchpage_core::PageConfig;

const CONFIG_GLOBAL: &str = "__SKETCH_PAGE";

/// Reads the optional `window.__SKETCH_PAGE` override. Anything unreadable
/// falls back to the shipped defaults.
pub(crate) fn load_page_config() -> PageConfig {
    let raw = match read_config_json() {
        Ok(Some(raw)) => raw,
        Ok(None) => return PageConfig::default(),
        Err(err) => {
            gloo::console::warn!("page config unreadable", js_err(err));
            return PageConfig::default();
        }
    };
    match PageConfig::from_json(&raw) {
        Ok(config) => {
            gloo::console::log!("page config override applied");
            config
        }
        Err(err) => {
            gloo::console::warn!("page config ignored", err.to_string());
            PageConfig::default()
        }
    }
}

fn read_config_json() -> Result<Option<String>, JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    let json = js_sys::JSON::stringify(&value)?;
    Ok(json.as_string())
}
