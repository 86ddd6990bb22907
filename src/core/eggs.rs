//! Easter egg tracking
//!
//! The page owns one `EasterEggRegistry` per run and lends it to the
//! terminal session and the Konami detector through the `EggTracker` trait.
//! Discovery is monotonic: once found, an egg stays found.

use std::collections::VecDeque;

use bitflags::bitflags;
use tracing::{debug, info};

/// Named easter eggs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EasterEgg {
    Konami,
    Matrix,
    Coffee,
    Rickroll,
    Secret,
}

impl EasterEgg {
    pub const ALL: [EasterEgg; 5] = [
        EasterEgg::Konami,
        EasterEgg::Matrix,
        EasterEgg::Coffee,
        EasterEgg::Rickroll,
        EasterEgg::Secret,
    ];

    /// Stable egg id
    pub fn id(&self) -> &'static str {
        match self {
            EasterEgg::Konami => "konami",
            EasterEgg::Matrix => "matrix",
            EasterEgg::Coffee => "coffee",
            EasterEgg::Rickroll => "rickroll",
            EasterEgg::Secret => "secret",
        }
    }

    #[allow(dead_code)]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|egg| egg.id() == id)
    }

    /// Display name used in notifications
    pub fn title(&self) -> &'static str {
        match self {
            EasterEgg::Konami => "Konami Code",
            EasterEgg::Matrix => "Follow the White Rabbit",
            EasterEgg::Coffee => "I'm a Teapot",
            EasterEgg::Rickroll => "Never Gonna Give You Up",
            EasterEgg::Secret => "The Secret Command",
        }
    }

    fn flag(&self) -> FoundEggs {
        match self {
            EasterEgg::Konami => FoundEggs::KONAMI,
            EasterEgg::Matrix => FoundEggs::MATRIX,
            EasterEgg::Coffee => FoundEggs::COFFEE,
            EasterEgg::Rickroll => FoundEggs::RICKROLL,
            EasterEgg::Secret => FoundEggs::SECRET,
        }
    }
}

bitflags! {
    /// Set of discovered eggs
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct FoundEggs: u8 {
        const KONAMI   = 0b0_0001;
        const MATRIX   = 0b0_0010;
        const COFFEE   = 0b0_0100;
        const RICKROLL = 0b0_1000;
        const SECRET   = 0b1_0000;
    }
}

/// Discovery seam between the page and the components that trigger eggs.
///
/// `is_found` is the read-only found-state; `on_found` is the discovery
/// callback. Calling `on_found` for an egg that is already found must be a
/// no-op for the implementor.
pub trait EggTracker {
    fn is_found(&self, egg: EasterEgg) -> bool;
    fn on_found(&mut self, egg: EasterEgg);
}

/// Per-session easter egg state
#[derive(Debug, Default)]
pub struct EasterEggRegistry {
    found: FoundEggs,
    /// Eggs discovered since the last drain, oldest first
    fresh: VecDeque<EasterEgg>,
}

impl EasterEggRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of eggs discovered so far
    pub fn found_count(&self) -> usize {
        self.found.bits().count_ones() as usize
    }

    pub fn total(&self) -> usize {
        EasterEgg::ALL.len()
    }

    #[allow(dead_code)]
    pub fn found(&self) -> FoundEggs {
        self.found
    }

    /// Take the eggs found since the previous call
    pub fn drain_new(&mut self) -> Vec<EasterEgg> {
        self.fresh.drain(..).collect()
    }
}

impl EggTracker for EasterEggRegistry {
    fn is_found(&self, egg: EasterEgg) -> bool {
        self.found.contains(egg.flag())
    }

    fn on_found(&mut self, egg: EasterEgg) {
        if self.is_found(egg) {
            debug!("Easter egg '{}' already found", egg.id());
            return;
        }
        self.found.insert(egg.flag());
        self.fresh.push_back(egg);
        info!(
            "Easter egg found: {} ({}/{})",
            egg.id(),
            self.found_count(),
            self.total()
        );
    }
}
