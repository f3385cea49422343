use serde::{Deserialize, Serialize};

use crate::upload::MAX_UPLOAD_BYTES;

pub const LAZYSIZES_SRC: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/lazysizes/5.3.2/lazysizes.min.js";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("page config is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("page config field {field} is out of range")]
    Range { field: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadElementIds {
    pub file_input: String,
    pub upload_area: String,
    pub placeholder: String,
    pub preview: String,
    pub preview_image: String,
    pub file_name: String,
    pub remove_button: String,
    pub form: String,
    pub loading_overlay: String,
}

impl Default for UploadElementIds {
    fn default() -> Self {
        Self {
            file_input: "fileInput".to_string(),
            upload_area: "uploadArea".to_string(),
            placeholder: "uploadPlaceholder".to_string(),
            preview: "uploadPreview".to_string(),
            preview_image: "previewImage".to_string(),
            file_name: "fileName".to_string(),
            remove_button: "removeFile".to_string(),
            form: "uploadForm".to_string(),
            loading_overlay: "loadingOverlay".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            selector: ".feature-card, .process-card, .tech-step, .info-card".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
        }
    }
}

/// Knobs for the page controller. The defaults are the values the site ships
/// with; a page may override any subset through `window.__SKETCH_PAGE`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub navbar_threshold_px: f64,
    pub max_upload_bytes: u64,
    pub alert_dismiss_ms: u32,
    pub progress_tick_ms: u32,
    pub submit_guard_ms: u32,
    pub rainbow_ms: u32,
    pub lazy_fallback_src: String,
    pub upload: UploadElementIds,
    pub reveal: RevealSettings,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            navbar_threshold_px: 50.0,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            alert_dismiss_ms: 5_000,
            progress_tick_ms: 300,
            submit_guard_ms: 3_000,
            rainbow_ms: 5_000,
            lazy_fallback_src: LAZYSIZES_SRC.to_string(),
            upload: UploadElementIds::default(),
            reveal: RevealSettings::default(),
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Range {
                field: "reveal.threshold",
            });
        }
        // the size alert names the limit in whole megabytes
        if self.max_upload_bytes < 1024 * 1024 {
            return Err(ConfigError::Range {
                field: "max_upload_bytes",
            });
        }
        if self.progress_tick_ms == 0 {
            return Err(ConfigError::Range {
                field: "progress_tick_ms",
            });
        }
        Ok(())
    }
}
