use std::collections::VecDeque;

pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

pub const KEY_WINDOW: usize = KONAMI_SEQUENCE.len();

pub const RAINBOW_ANIMATION: &str = "rainbow 2s linear infinite";

pub const RAINBOW_KEYFRAMES: &str = "
    @keyframes rainbow {
        0% { filter: hue-rotate(0deg); }
        100% { filter: hue-rotate(360deg); }
    }
";

/// Rolling window over the most recent key identifiers.
#[derive(Debug, Clone, Default)]
pub struct KeySequenceBuffer {
    keys: VecDeque<String>,
}

impl KeySequenceBuffer {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::with_capacity(KEY_WINDOW),
        }
    }

    /// Records a key and reports whether the window now spells the sequence.
    pub fn push(&mut self, key: &str) -> bool {
        self.keys.push_back(key.to_string());
        while self.keys.len() > KEY_WINDOW {
            self.keys.pop_front();
        }
        self.matches()
    }

    pub fn matches(&self) -> bool {
        self.keys.len() == KEY_WINDOW
            && self
                .keys
                .iter()
                .zip(KONAMI_SEQUENCE.iter())
                .all(|(key, expected)| key == expected)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
