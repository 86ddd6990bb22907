//! Konami code detection
//!
//! Listens to every raw key-down name, regardless of input focus, and
//! reports the `konami` egg when the last ten keys match the sequence.

use std::collections::VecDeque;

use tracing::debug;

use super::eggs::{EasterEgg, EggTracker};

/// Target key sequence (DOM-style key names)
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

/// Rolling buffer of the most recent key names
#[derive(Debug, Default)]
pub struct KonamiDetector {
    keys: VecDeque<String>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::with_capacity(KONAMI_SEQUENCE.len()),
        }
    }

    /// Feed one key-down. Returns true when the sequence completed.
    pub fn feed(&mut self, key: &str, eggs: &mut dyn EggTracker) -> bool {
        self.keys.push_back(key.to_string());
        while self.keys.len() > KONAMI_SEQUENCE.len() {
            self.keys.pop_front();
        }

        if !self.matches() {
            return false;
        }

        debug!("Konami sequence entered");
        self.keys.clear();
        eggs.on_found(EasterEgg::Konami);
        true
    }

    /// Number of buffered keys
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    fn matches(&self) -> bool {
        self.keys.len() == KONAMI_SEQUENCE.len()
            && self
                .keys
                .iter()
                .zip(KONAMI_SEQUENCE.iter())
                .all(|(key, target)| key == target)
    }
}
