//! Core terminal logic.
//!
//! This module contains everything that does not touch the real terminal:
//!
//! - **line**: transcript lines and their kinds
//! - **boot**: the timed boot log played when a session starts
//! - **commands**: command registry, matching and handlers
//! - **eggs**: easter egg ids and the per-run registry
//! - **konami**: raw key sequence detector
//! - **session**: input buffer, history recall and command submission
//!
//! # Architecture
//!
//! ```text
//! App (owns EasterEggRegistry, KonamiDetector)
//! └── TerminalSession
//!     ├── transcript: Vec<HistoryLine>
//!     ├── input buffer + cursor
//!     ├── CommandHistoryLog (Up/Down recall)
//!     ├── CommandRegistry
//!     └── BootSequencer
//! ```

pub mod boot;
pub mod commands;
pub mod eggs;
pub mod konami;
pub mod line;
pub mod session;

pub use boot::{default_boot_steps, BootSequencer};
pub use eggs::{EasterEgg, EasterEggRegistry, EggTracker};
pub use konami::KonamiDetector;
pub use line::{HistoryLine, LineKind};
pub use session::{Key, TerminalSession};
