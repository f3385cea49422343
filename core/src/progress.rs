pub const PROGRESS_STEP_MAX: f64 = 15.0;
pub const PROGRESS_CAP: f64 = 90.0;

/// Loading bar that creeps forward but never reports completion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FakeProgress {
    value: f64,
}

impl FakeProgress {
    pub fn new() -> Self {
        Self { value: 0.0 }
    }

    /// Advances by `sample * PROGRESS_STEP_MAX` where `sample` is a unit
    /// random draw. Out-of-range samples are clamped into [0, 1].
    pub fn advance(&mut self, sample: f64) -> f64 {
        let sample = if sample.is_finite() {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.value = (self.value + sample * PROGRESS_STEP_MAX).min(PROGRESS_CAP);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn width_style(&self) -> String {
        format!("{}%", self.value)
    }
}
