pub const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
background: rgba(0, 0, 0, 0.95); display: flex; align-items: center; justify-content: center; \
z-index: 9999; cursor: pointer; padding: 2rem;";

pub const FULL_IMAGE_STYLE: &str = "max-width: 90%; max-height: 90%; border-radius: 10px; \
box-shadow: 0 20px 60px rgba(0, 0, 0, 0.5);";

/// Guards the full-screen viewer so rapid clicks cannot stack overlays.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewerLatch {
    open: bool,
}

impl ViewerLatch {
    pub fn new() -> Self {
        Self { open: false }
    }

    /// Returns true if the caller may open a viewer.
    pub fn try_open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        true
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
