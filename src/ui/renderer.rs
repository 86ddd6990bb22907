//! Terminal renderer using crossterm
//!
//! Renders the session transcript, the prompt line and the easter egg
//! notification to the console. Layout is computed separately from drawing
//! so it can be tested without a terminal.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{
        Attribute, Print, ResetColor, SetAttribute,
        SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{Color, ColorScheme};
use crate::core::{LineKind, TerminalSession};

/// Everything needed to draw one frame
pub struct Frame<'a> {
    pub session: &'a TerminalSession,
    pub scheme: &'a ColorScheme,
    pub prompt: &'a str,
    pub toast: Option<&'a str>,
}

/// A screen row made of colored segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRow {
    pub segments: Vec<(Color, String)>,
}

impl StyledRow {
    fn plain(color: Color, text: String) -> Self {
        Self {
            segments: vec![(color, text)],
        }
    }

    #[allow(dead_code)]
    pub fn text(&self) -> String {
        self.segments.iter().map(|(_, s)| s.as_str()).collect()
    }
}

/// Computed screen contents
#[derive(Debug)]
pub struct Layout {
    pub rows: Vec<StyledRow>,
    /// Cursor position (col, row), hidden when `None`
    pub cursor: Option<(u16, u16)>,
}

/// Split `text` into rows no wider than `width` display columns
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    rows.push(current);
    rows
}

/// Lay out a frame on a `cols` x `rows` screen
pub fn layout(frame: &Frame<'_>, cols: u16, rows: u16) -> Layout {
    let width = cols.max(1) as usize;
    let height = rows.max(1) as usize;
    let scheme = frame.scheme;
    let session = frame.session;

    // Prompt line
    let mut input_rows = Vec::new();
    let mut cursor = None;
    if session.accepts_input() {
        let line = format!("{}{}", frame.prompt, session.input());
        input_rows = prompt_rows(&line, frame.prompt, scheme, width);

        // Wrap up to and including the cell under the cursor, so wide
        // characters pushed to the next row move the cursor with them
        let mut upto = frame.prompt.to_string();
        upto.extend(session.input().chars().take(session.cursor()));
        let under = session.input().chars().nth(session.cursor()).unwrap_or(' ');
        upto.push(under);
        let wrapped = wrap(&upto, width);
        let row = wrapped.len().saturating_sub(1);
        let col = wrapped
            .last()
            .map_or(0, |r| r.width().saturating_sub(under.width().unwrap_or(0)));
        cursor = Some((col as u16, row as u16));
    }

    // Transcript, newest at the bottom
    let mut transcript_rows = Vec::new();
    for line in session.transcript() {
        let color = scheme.line_fg(line.kind);
        if line.kind == LineKind::Input {
            let echo = format!("{}{}", frame.prompt, line.content);
            transcript_rows.extend(prompt_rows(&echo, frame.prompt, scheme, width));
            continue;
        }
        for row in line.rows() {
            for wrapped in wrap(row, width) {
                transcript_rows.push(StyledRow::plain(color, wrapped));
            }
        }
    }

    let input_height = input_rows.len().max(cursor.map_or(0, |(_, r)| r as usize + 1));
    let available = height.saturating_sub(input_height);
    let skip = transcript_rows.len().saturating_sub(available);
    let mut screen: Vec<StyledRow> = transcript_rows.into_iter().skip(skip).collect();

    let top = screen.len();
    screen.extend(input_rows);
    let cursor = cursor.and_then(|(col, row)| {
        let row = top + row as usize;
        (row < height).then_some((col, row as u16))
    });

    Layout {
        rows: screen,
        cursor,
    }
}

fn prompt_rows(line: &str, prompt: &str, scheme: &ColorScheme, width: usize) -> Vec<StyledRow> {
    wrap(line, width)
        .into_iter()
        .enumerate()
        .map(|(i, row)| match row.strip_prefix(prompt) {
            Some(rest) if i == 0 => StyledRow {
                segments: vec![
                    (scheme.prompt_fg, prompt.to_string()),
                    (scheme.input_fg, rest.to_string()),
                ],
            },
            _ => StyledRow::plain(scheme.input_fg, row),
        })
        .collect()
}

/// Terminal renderer
pub struct Renderer {
    /// Whether the terminal has been initialized
    initialized: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { initialized: false }
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            DisableLineWrap,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;

        stdout.flush()?;
        self.initialized = true;
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();

        // Reset all attributes first
        let _ = execute!(stdout, ResetColor, SetAttribute(Attribute::Reset));

        // Show cursor
        let _ = execute!(stdout, Show);

        // Enable line wrap
        let _ = execute!(stdout, EnableLineWrap);

        // Leave alternate screen
        let _ = execute!(stdout, LeaveAlternateScreen);

        // Flush output
        let _ = stdout.flush();

        // Disable raw mode - this is the most important part
        terminal::disable_raw_mode()?;

        Ok(())
    }

    /// Render one frame
    pub fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let (cols, rows) = Self::size()?;
        let screen = layout(frame, cols, rows);

        // Use a buffered writer for better performance
        let stdout = io::stdout();
        let mut stdout = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(stdout, "\x1b[?2026h")?;
        queue!(stdout, Hide)?;

        for row_idx in 0..rows {
            queue!(stdout, MoveTo(0, row_idx), Clear(ClearType::CurrentLine))?;
            if let Some(row) = screen.rows.get(row_idx as usize) {
                for (color, text) in &row.segments {
                    queue!(stdout, SetForegroundColor(color.to_crossterm()), Print(text))?;
                }
            }
        }
        queue!(stdout, ResetColor)?;

        if let Some(toast) = frame.toast {
            self.render_toast(&mut stdout, toast, frame.scheme, cols)?;
        }

        // Update cursor position
        if let Some((col, row)) = screen.cursor {
            queue!(stdout, MoveTo(col, row), Show)?;
        }

        // End synchronized update
        write!(stdout, "\x1b[?2026l")?;

        stdout.flush()
    }

    /// Notification in the top-right corner
    fn render_toast<W: Write>(&self, stdout: &mut W, toast: &str, scheme: &ColorScheme, cols: u16) -> io::Result<()> {
        let text = format!(" {} ", toast);
        let text = wrap(&text, cols as usize).swap_remove(0);
        let col = (cols as usize).saturating_sub(text.width()) as u16;
        queue!(
            stdout,
            MoveTo(col, 0),
            SetBackgroundColor(scheme.toast_bg.to_crossterm()),
            SetForegroundColor(scheme.toast_fg.to_crossterm()),
            SetAttribute(Attribute::Bold),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }

    /// Get terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Plain-text renderer for demo mode and tests
pub struct DebugRenderer;

impl DebugRenderer {
    /// Render the transcript and prompt to a string
    pub fn render(session: &TerminalSession, prompt: &str) -> String {
        let mut output = String::new();
        for line in session.transcript() {
            match line.kind {
                LineKind::Input => output.push_str(&format!("{}{}\n", prompt, line.content)),
                LineKind::Error => {
                    for row in line.rows() {
                        output.push_str(&format!("! {}\n", row));
                    }
                }
                _ => {
                    output.push_str(&line.content);
                    output.push('\n');
                }
            }
        }
        if session.accepts_input() {
            output.push_str(prompt);
            output.push_str(session.input());
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BootSequencer, EasterEggRegistry};
    use crate::profile::Profile;

    fn session() -> TerminalSession {
        TerminalSession::new(Profile::default(), BootSequencer::finished())
    }

    #[test]
    fn test_wrap_by_display_width() {
        assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap("", 4), vec![""]);
        // Wide characters take two columns
        assert_eq!(wrap("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_layout_keeps_newest_rows() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        for i in 0..20 {
            s.execute(&format!("echo {}", i), &mut eggs);
        }
        let scheme = ColorScheme::default_scheme();
        let frame = Frame {
            session: &s,
            scheme: &scheme,
            prompt: "$ ",
            toast: None,
        };

        let screen = layout(&frame, 40, 5);

        assert_eq!(screen.rows.len(), 5);
        assert_eq!(screen.rows[3].text(), "19");
        assert_eq!(screen.rows[4].text(), "$ ");
        assert_eq!(screen.cursor, Some((2, 4)));
    }

    #[test]
    fn test_layout_cursor_follows_input() {
        let mut s = session();
        s.insert_str("help");
        let scheme = ColorScheme::default_scheme();
        let frame = Frame {
            session: &s,
            scheme: &scheme,
            prompt: "$ ",
            toast: None,
        };

        let screen = layout(&frame, 80, 24);
        assert_eq!(screen.rows[0].segments[0], (scheme.prompt_fg, "$ ".to_string()));
        assert_eq!(screen.rows[0].segments[1], (scheme.input_fg, "help".to_string()));
        assert_eq!(screen.cursor, Some((6, 0)));
    }

    #[test]
    fn test_layout_cursor_after_wrapped_wide_char() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.insert_str("a日");
        let scheme = ColorScheme::default_scheme();

        let screen = layout(
            &Frame {
                session: &s,
                scheme: &scheme,
                prompt: "$ ",
                toast: None,
            },
            4,
            24,
        );
        assert_eq!(screen.rows[0].text(), "$ a");
        assert_eq!(screen.rows[1].text(), "日");
        assert_eq!(screen.cursor, Some((2, 1)));

        // On the wide char itself
        s.handle_key(crate::core::Key::Left, &mut eggs);
        let screen = layout(
            &Frame {
                session: &s,
                scheme: &scheme,
                prompt: "$ ",
                toast: None,
            },
            4,
            24,
        );
        assert_eq!(screen.cursor, Some((0, 1)));
    }

    #[test]
    fn test_layout_cursor_after_full_row() {
        let mut s = session();
        s.insert_str("ab");
        let scheme = ColorScheme::default_scheme();
        let frame = Frame {
            session: &s,
            scheme: &scheme,
            prompt: "$ ",
            toast: None,
        };

        let screen = layout(&frame, 4, 24);
        assert_eq!(screen.rows[0].text(), "$ ab");
        assert_eq!(screen.cursor, Some((0, 1)));
    }

    #[test]
    fn test_layout_hides_prompt_while_booting() {
        let s = TerminalSession::new(
            Profile::default(),
            BootSequencer::start(crate::core::default_boot_steps(), std::time::Instant::now()),
        );
        let scheme = ColorScheme::default_scheme();
        let frame = Frame {
            session: &s,
            scheme: &scheme,
            prompt: "$ ",
            toast: None,
        };

        let screen = layout(&frame, 80, 24);
        assert!(screen.rows.is_empty());
        assert_eq!(screen.cursor, None);
    }

    #[test]
    fn test_debug_render() {
        let mut s = session();
        let mut eggs = EasterEggRegistry::new();
        s.execute("whoami", &mut eggs);
        s.execute("nope", &mut eggs);

        let text = DebugRenderer::render(&s, "$ ");
        assert_eq!(
            text,
            "$ whoami\nguest\n$ nope\n! Command not found: nope. Type 'help' for available commands.\n$ "
        );
    }
}
