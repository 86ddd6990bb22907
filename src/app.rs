//! Application shell
//!
//! Plays the role of the portfolio page: it owns the easter egg registry
//! for this run, feeds every raw key to the Konami detector, forwards
//! editing keys to the terminal session and shows a notification whenever
//! a new egg turns up.

use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{info, warn};

use crate::config::ColorScheme;
use crate::core::{
    default_boot_steps, BootSequencer, EasterEgg, EasterEggRegistry, KonamiDetector,
    TerminalSession,
};
use crate::profile::Profile;
use crate::ui::{Action, Frame, KeyMapper, Renderer};

/// How long an easter egg notification stays up
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Upper bound on a single event poll
const MAX_POLL: Duration = Duration::from_millis(250);

/// Application settings resolved from config file and command line
pub struct AppOptions {
    pub scheme: ColorScheme,
    pub prompt: String,
    pub profile: Profile,
    pub boot: bool,
}

struct Toast {
    text: String,
    until: Instant,
}

/// The running application
pub struct App {
    session: TerminalSession,
    eggs: EasterEggRegistry,
    konami: KonamiDetector,
    scheme: ColorScheme,
    prompt: String,
    toast: Option<Toast>,
    clipboard: Option<arboard::Clipboard>,
    quit: bool,
}

impl App {
    pub fn new(options: AppOptions, now: Instant) -> Self {
        let boot = if options.boot {
            BootSequencer::start(default_boot_steps(), now)
        } else {
            BootSequencer::finished()
        };

        Self {
            session: TerminalSession::new(options.profile, boot),
            eggs: EasterEggRegistry::new(),
            konami: KonamiDetector::new(),
            scheme: options.scheme,
            prompt: options.prompt,
            toast: None,
            clipboard: None,
            quit: false,
        }
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn eggs(&self) -> &EasterEggRegistry {
        &self.eggs
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Current notification text
    pub fn toast(&self) -> Option<&str> {
        self.toast.as_ref().map(|t| t.text.as_str())
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            session: &self.session,
            scheme: &self.scheme,
            prompt: &self.prompt,
            toast: self.toast(),
        }
    }

    /// Advance timers. Returns true if a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut dirty = self.session.tick(now);
        if self.toast.as_ref().is_some_and(|t| now >= t.until) {
            self.toast = None;
            dirty = true;
        }
        dirty
    }

    /// Handle one key press. Returns true if a redraw is needed.
    pub fn handle_key_event(&mut self, event: &KeyEvent, now: Instant) -> bool {
        // The Konami listener sees every key, focused or not
        if let Some(name) = KeyMapper::key_name(event) {
            self.konami.feed(&name, &mut self.eggs);
        }

        let dirty = match KeyMapper::map(event) {
            Some(Action::Edit(key)) => self.session.handle_key(key, &mut self.eggs),
            Some(Action::Paste) => self.paste(),
            Some(Action::Quit) => {
                self.quit = true;
                false
            }
            None => false,
        };

        self.show_discoveries(now) || dirty
    }

    /// Submit a whole command line, as if typed
    pub fn submit_line(&mut self, line: &str, now: Instant) {
        self.session.execute(line, &mut self.eggs);
        self.show_discoveries(now);
    }

    /// Run the interactive loop until the user quits
    pub fn run(&mut self, renderer: &mut Renderer) -> anyhow::Result<()> {
        renderer.render(&self.frame()).context("initial render")?;

        while !self.should_quit() {
            let now = Instant::now();
            let mut dirty = self.tick(now);

            if event::poll(self.poll_timeout(now))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        dirty |= self.handle_key_event(&key, Instant::now());
                    }
                    Event::Resize(cols, rows) => {
                        info!("Resize: {}x{}", cols, rows);
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if dirty {
                renderer.render(&self.frame()).context("render")?;
            }
        }

        self.session.teardown();
        info!(
            "Leaving with {}/{} easter eggs found",
            self.eggs.found_count(),
            self.eggs.total()
        );
        Ok(())
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        [
            self.session.next_deadline(),
            self.toast.as_ref().map(|t| t.until),
        ]
        .into_iter()
        .flatten()
        .map(|deadline| deadline.saturating_duration_since(now))
        .fold(MAX_POLL, Duration::min)
    }

    fn show_discoveries(&mut self, now: Instant) -> bool {
        let found = self.eggs.drain_new();
        let Some(last) = found.last().copied() else {
            return false;
        };

        if found.contains(&EasterEgg::Matrix) {
            self.scheme = ColorScheme::matrix();
        }
        self.toast = Some(Toast {
            text: format!(
                "Easter egg found: {} ({}/{})",
                last.title(),
                self.eggs.found_count(),
                self.eggs.total()
            ),
            until: now + TOAST_DURATION,
        });
        true
    }

    fn paste(&mut self) -> bool {
        if self.clipboard.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    warn!("Clipboard unavailable: {}", e);
                    return false;
                }
            }
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return false;
        };
        match clipboard.get_text() {
            Ok(text) => {
                self.session.insert_str(&text);
                true
            }
            Err(e) => {
                warn!("Failed to paste: {}", e);
                false
            }
        }
    }
}
