//! Terminal session
//!
//! Owns the transcript, the single-line input buffer, the command history
//! and the boot sequence. The session never touches easter egg state
//! directly; it reads and reports discoveries through an `EggTracker`
//! supplied by the caller on every event.

use std::time::Instant;

use tracing::{debug, info};

use super::boot::BootSequencer;
use super::commands::{CommandRegistry, Effect};
use super::eggs::EggTracker;
use super::line::HistoryLine;
use crate::history::{CommandHistoryLog, Recall};
use crate::profile::Profile;

/// Editing keys understood by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Tab,
    /// Ctrl+U
    ClearLine,
    /// Ctrl+L
    ClearScreen,
}

/// One interactive terminal
pub struct TerminalSession {
    transcript: Vec<HistoryLine>,
    /// Current input line (never contains newlines)
    input: String,
    /// Cursor position in chars
    cursor: usize,
    history: CommandHistoryLog,
    registry: CommandRegistry,
    profile: Profile,
    boot: BootSequencer,
    closed: bool,
}

impl TerminalSession {
    pub fn new(profile: Profile, boot: BootSequencer) -> Self {
        Self {
            transcript: Vec::new(),
            input: String::new(),
            cursor: 0,
            history: CommandHistoryLog::new(),
            registry: CommandRegistry::standard(),
            profile,
            boot,
            closed: false,
        }
    }

    /// Rendered lines, oldest first
    pub fn transcript(&self) -> &[HistoryLine] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position within the input, in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[allow(dead_code)]
    pub fn history(&self) -> &CommandHistoryLog {
        &self.history
    }

    #[allow(dead_code)]
    pub fn is_booting(&self) -> bool {
        self.boot.is_running()
    }

    /// Whether keystrokes currently edit the input
    pub fn accepts_input(&self) -> bool {
        !self.closed && !self.boot.is_running()
    }

    /// Append any boot lines that are due. Returns true if the transcript changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.closed {
            return false;
        }
        let lines = self.boot.poll(now);
        let changed = !lines.is_empty();
        self.transcript.extend(lines);
        if changed && !self.boot.is_running() {
            info!("Boot sequence complete");
        }
        changed
    }

    /// Deadline of the next scheduled boot line
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.closed {
            return None;
        }
        self.boot.next_deadline()
    }

    /// Handle one key. Returns true if anything visible changed.
    pub fn handle_key(&mut self, key: Key, eggs: &mut dyn EggTracker) -> bool {
        if !self.accepts_input() {
            return false;
        }

        match key {
            Key::Char(ch) => {
                self.insert_char(ch);
                true
            }
            Key::Enter => {
                self.submit(eggs);
                true
            }
            Key::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.input.remove(at);
                true
            }
            Key::Delete => {
                if self.cursor >= self.char_len() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.input.remove(at);
                true
            }
            Key::Left => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                true
            }
            Key::Right => {
                if self.cursor >= self.char_len() {
                    return false;
                }
                self.cursor += 1;
                true
            }
            Key::Home => {
                self.cursor = 0;
                true
            }
            Key::End => {
                self.cursor = self.char_len();
                true
            }
            Key::Up => self.history_up(),
            Key::Down => self.history_down(),
            Key::Tab => self.complete(),
            Key::ClearLine => {
                self.set_input("");
                true
            }
            Key::ClearScreen => {
                self.transcript.clear();
                true
            }
        }
    }

    /// Submit the input buffer and clear it
    pub fn submit(&mut self, eggs: &mut dyn EggTracker) {
        let line = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.execute(&line, eggs);
    }

    /// Interpret one raw input line. Ignored while booting or after teardown.
    pub fn execute(&mut self, raw: &str, eggs: &mut dyn EggTracker) {
        if !self.accepts_input() {
            return;
        }
        let command = raw.trim();
        if command.is_empty() {
            return;
        }

        let output = self
            .registry
            .run(command, &self.profile, self.history.entries());

        if !output.effects.contains(&Effect::Clear) {
            self.transcript.push(HistoryLine::input(command));
        }
        self.transcript.extend(output.lines);

        for effect in output.effects {
            match effect {
                Effect::Clear => {
                    debug!("Clearing {} transcript lines", self.transcript.len());
                    self.transcript.clear();
                }
                Effect::Discover(egg) => {
                    if eggs.is_found(egg) {
                        continue;
                    }
                    eggs.on_found(egg);
                    self.transcript.push(HistoryLine::success(format!(
                        "*** Easter egg discovered: {} ***",
                        egg.title()
                    )));
                }
            }
        }

        self.history.push(command);
    }

    /// Insert text at the cursor; line breaks become spaces
    pub fn insert_str(&mut self, text: &str) {
        if !self.accepts_input() {
            return;
        }
        let flat = text.lines().collect::<Vec<_>>().join(" ");
        for ch in flat.chars() {
            self.insert_char(ch);
        }
    }

    /// Stop the session; pending boot lines are dropped
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.boot.cancel();
        self.closed = true;
        debug!("Terminal session torn down");
    }

    fn history_up(&mut self) -> bool {
        let entry = match self.history.up() {
            Some(entry) => entry.to_string(),
            None => return false,
        };
        self.set_input(&entry);
        true
    }

    fn history_down(&mut self) -> bool {
        let next = match self.history.down() {
            Recall::Entry(entry) => entry.to_string(),
            Recall::Cleared => String::new(),
            Recall::Unchanged => return false,
        };
        self.set_input(&next);
        true
    }

    fn complete(&mut self) -> bool {
        let prefix = self.input.trim_start().to_string();
        if prefix.is_empty() {
            return false;
        }
        let candidates = self.registry.complete(&prefix);
        match candidates.as_slice() {
            [] => false,
            [only] => {
                self.set_input(only);
                true
            }
            many => {
                self.transcript.push(HistoryLine::system(many.join("  ")));
                true
            }
        }
    }

    fn insert_char(&mut self, ch: char) {
        let ch = if ch.is_control() { ' ' } else { ch };
        let at = self.byte_index(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map_or(self.input.len(), |(i, _)| i)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::boot::{default_boot_steps, BootStep};
    use crate::core::eggs::{EasterEgg, EasterEggRegistry};
    use crate::core::line::LineKind;

    fn session() -> TerminalSession {
        TerminalSession::new(Profile::default(), BootSequencer::finished())
    }

    fn type_line(s: &mut TerminalSession, text: &str, eggs: &mut dyn EggTracker) {
        for ch in text.chars() {
            s.handle_key(Key::Char(ch), eggs);
        }
        s.handle_key(Key::Enter, eggs);
    }

    #[test]
    fn test_history_recall_clamps() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        type_line(&mut s, "help", &mut eggs);
        type_line(&mut s, "about", &mut eggs);

        s.handle_key(Key::Up, &mut eggs);
        assert_eq!(s.input(), "about");
        s.handle_key(Key::Up, &mut eggs);
        assert_eq!(s.input(), "help");
        assert!(!s.handle_key(Key::Up, &mut eggs));
        assert_eq!(s.input(), "help");

        s.handle_key(Key::Down, &mut eggs);
        assert_eq!(s.input(), "about");
        s.handle_key(Key::Down, &mut eggs);
        assert_eq!(s.input(), "");
        assert_eq!(s.history().index(), -1);
    }

    #[test]
    fn test_down_at_rest_keeps_buffer() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        type_line(&mut s, "help", &mut eggs);
        s.insert_str("draft");

        assert!(!s.handle_key(Key::Down, &mut eggs));
        assert_eq!(s.input(), "draft");
    }

    #[test]
    fn test_clear_empties_transcript() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        for cmd in ["help", "about", "skills", "nope"] {
            s.execute(cmd, &mut eggs);
        }
        assert!(!s.transcript().is_empty());

        s.execute("clear", &mut eggs);
        assert!(s.transcript().is_empty());
        assert_eq!(s.history().len(), 5);
    }

    #[test]
    fn test_unknown_command_lines() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();

        type_line(&mut s, "unknowncmd123", &mut eggs);

        let kinds: Vec<LineKind> = s.transcript().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Input, LineKind::Error]);
        assert_eq!(s.transcript()[0].content, "unknowncmd123");
        assert_eq!(eggs.found_count(), 0);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_secret_announced_once() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();

        s.execute("secret", &mut eggs);
        assert!(eggs.is_found(EasterEgg::Secret));
        let first: Vec<LineKind> = s.transcript().iter().map(|l| l.kind).collect();
        assert_eq!(first, vec![LineKind::Input, LineKind::Output, LineKind::Success]);

        s.execute("secret", &mut eggs);
        assert!(eggs.is_found(EasterEgg::Secret));
        let second: Vec<LineKind> = s.transcript()[3..].iter().map(|l| l.kind).collect();
        assert_eq!(second, vec![LineKind::Input, LineKind::Output]);
        assert_eq!(eggs.drain_new(), vec![EasterEgg::Secret]);
    }

    #[test]
    fn test_egg_found_elsewhere_is_not_announced() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        eggs.on_found(EasterEgg::Matrix);

        s.execute("matrix", &mut eggs);
        assert!(s
            .transcript()
            .iter()
            .all(|l| l.kind != LineKind::Success));
    }

    #[test]
    fn test_empty_submission_is_noop() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.insert_str("   ");
        s.handle_key(Key::Enter, &mut eggs);

        assert!(s.transcript().is_empty());
        assert!(s.history().is_empty());
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_input_is_trimmed_and_echoed() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.execute("   whoami  ", &mut eggs);
        assert_eq!(s.transcript()[0], HistoryLine::input("whoami"));
        assert_eq!(s.history().entries(), &["whoami".to_string()]);
    }

    #[test]
    fn test_cursor_editing() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.insert_str("hlp");
        s.handle_key(Key::Left, &mut eggs);
        s.handle_key(Key::Left, &mut eggs);
        s.handle_key(Key::Char('e'), &mut eggs);
        assert_eq!(s.input(), "help");
        assert_eq!(s.cursor(), 2);

        s.handle_key(Key::End, &mut eggs);
        s.handle_key(Key::Backspace, &mut eggs);
        assert_eq!(s.input(), "hel");
        s.handle_key(Key::Home, &mut eggs);
        s.handle_key(Key::Delete, &mut eggs);
        assert_eq!(s.input(), "el");
        assert!(!s.handle_key(Key::Left, &mut eggs));

        s.handle_key(Key::ClearLine, &mut eggs);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.insert_str("héllo");
        s.handle_key(Key::Left, &mut eggs);
        s.handle_key(Key::Backspace, &mut eggs);
        assert_eq!(s.input(), "hélo");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut s = session();
        s.insert_str("echo a\r\nb\nc");
        assert_eq!(s.input(), "echo a b c");
        assert!(!s.input().contains('\n'));
    }

    #[test]
    fn test_tab_completion() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.insert_str("sk");
        s.handle_key(Key::Tab, &mut eggs);
        assert_eq!(s.input(), "skills");

        s.handle_key(Key::ClearLine, &mut eggs);
        s.insert_str("p");
        s.handle_key(Key::Tab, &mut eggs);
        assert_eq!(s.input(), "p");
        assert_eq!(s.transcript().last(), Some(&HistoryLine::system("projects  pwd")));
    }

    #[test]
    fn test_ctrl_l_clears_screen() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.execute("help", &mut eggs);
        s.handle_key(Key::ClearScreen, &mut eggs);
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn test_boot_blocks_input_until_done() {
        let t0 = Instant::now();
        let steps = default_boot_steps();
        let total: Duration = steps.iter().map(|s| s.delay).sum();
        let mut s = TerminalSession::new(Profile::default(), BootSequencer::start(steps, t0));
        let mut eggs = EasterEggRegistry::new();

        assert!(s.is_booting());
        assert!(!s.handle_key(Key::Char('h'), &mut eggs));
        assert_eq!(s.input(), "");

        assert!(s.tick(t0 + total));
        assert_eq!(s.transcript().len(), 7);
        assert!(!s.is_booting());
        assert!(s.handle_key(Key::Char('h'), &mut eggs));
    }

    #[test]
    fn test_teardown_cancels_boot() {
        let t0 = Instant::now();
        let steps = vec![
            BootStep::new(LineKind::System, "one", 200),
            BootStep::new(LineKind::System, "two", 200),
        ];
        let mut s = TerminalSession::new(Profile::default(), BootSequencer::start(steps, t0));

        assert!(s.tick(t0 + Duration::from_millis(200)));
        s.teardown();

        assert!(!s.tick(t0 + Duration::from_secs(10)));
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn test_execute_ignored_while_booting_or_closed() {
        let t0 = Instant::now();
        let steps = vec![BootStep::new(LineKind::System, "one", 200)];
        let mut s = TerminalSession::new(Profile::default(), BootSequencer::start(steps, t0));
        let mut eggs = EasterEggRegistry::new();

        s.execute("secret", &mut eggs);
        assert!(s.transcript().is_empty());
        assert!(s.history().is_empty());
        assert!(!eggs.is_found(EasterEgg::Secret));

        s.tick(t0 + Duration::from_millis(200));
        s.execute("whoami", &mut eggs);
        assert_eq!(s.transcript().len(), 3);

        s.teardown();
        s.execute("whoami", &mut eggs);
        assert_eq!(s.transcript().len(), 3);
        assert_eq!(s.history().len(), 1);
    }
}
