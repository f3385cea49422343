//! Style values the page writes that do not belong to a stateful widget.

pub const NAVBAR_SOLID: &str = "rgba(15, 23, 42, 0.98)";
pub const NAVBAR_TRANSLUCENT: &str = "rgba(15, 23, 42, 0.95)";

pub const REVEAL_HIDDEN_OPACITY: &str = "0";
pub const REVEAL_HIDDEN_TRANSFORM: &str = "translateY(30px)";
pub const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";
pub const REVEAL_SHOWN_OPACITY: &str = "1";
pub const REVEAL_SHOWN_TRANSFORM: &str = "translateY(0)";

pub const LOADING_OVERLAY_DISPLAY: &str = "flex";

pub fn navbar_background(scroll_y: f64, threshold: f64) -> &'static str {
    if scroll_y > threshold {
        NAVBAR_SOLID
    } else {
        NAVBAR_TRANSLUCENT
    }
}

/// Turns an in-page anchor href into a selector, or `None` when the href
/// cannot name an element (`#`, empty, or not a fragment at all).
pub fn anchor_target_selector(href: &str) -> Option<&str> {
    let href = href.trim();
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    Some(href)
}
