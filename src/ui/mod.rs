//! User interface rendering and input handling.
//!
//! - **renderer**: crossterm renderer for the transcript, prompt and notifications
//! - **keymapper**: keyboard input to session actions and DOM-style key names

pub mod keymapper;
pub mod renderer;

pub use keymapper::{Action, KeyMapper};
pub use renderer::{DebugRenderer, Frame, Renderer};
