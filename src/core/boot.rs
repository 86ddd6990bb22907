//! Boot sequence playback
//!
//! The boot log is a fixed list of `(kind, content, delay)` steps played
//! one after another. Each delay starts when the previous step's wait ends,
//! so step `n` is due at the sum of the first `n + 1` delays. Only one step
//! is pending at a time.
//!
//! Playback is driven by the event loop: it asks for `next_deadline()` to
//! size its poll timeout and calls `poll(now)` to collect due lines. After
//! `cancel()` nothing more is ever emitted.

use std::time::{Duration, Instant};

use tracing::debug;

use super::line::{HistoryLine, LineKind};

/// One scheduled boot line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootStep {
    pub kind: LineKind,
    pub content: String,
    pub delay: Duration,
}

impl BootStep {
    pub fn new(kind: LineKind, content: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            kind,
            content: content.into(),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

const BANNER: &str = r#" _                       __       _ _
| |_ ___ _ __ _ __ ___  / _| ___ | (_) ___
| __/ _ \ '__| '_ ` _ \| |_ / _ \| | |/ _ \
| ||  __/ |  | | | | | |  _| (_) | | | (_) |
 \__\___|_|  |_| |_| |_|_|  \___/|_|_|\___/"#;

/// The standard boot log
pub fn default_boot_steps() -> Vec<BootStep> {
    vec![
        BootStep::new(LineKind::System, "Initializing portfolio terminal v1.0.0...", 300),
        BootStep::new(LineKind::System, "Loading kernel modules... [OK]", 500),
        BootStep::new(LineKind::System, "Mounting /home/guest... [OK]", 400),
        BootStep::new(LineKind::System, "Starting network services... [OK]", 600),
        BootStep::new(LineKind::Output, BANNER, 800),
        BootStep::new(LineKind::Success, "System ready. Welcome aboard!", 1200),
        BootStep::new(LineKind::Output, "Type 'help' to see available commands.", 200),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootState {
    /// Waiting for `steps[next]` at `due`
    Pending { next: usize, due: Instant },
    Finished,
    Cancelled,
}

/// Sequential, cancellable boot log player
#[derive(Debug)]
pub struct BootSequencer {
    steps: Vec<BootStep>,
    state: BootState,
}

impl BootSequencer {
    /// Start playback at `now`
    pub fn start(steps: Vec<BootStep>, now: Instant) -> Self {
        let state = match steps.first() {
            Some(first) => BootState::Pending {
                next: 0,
                due: now + first.delay,
            },
            None => BootState::Finished,
        };
        Self { steps, state }
    }

    /// A sequencer with nothing left to play
    pub fn finished() -> Self {
        Self {
            steps: Vec::new(),
            state: BootState::Finished,
        }
    }

    /// Emit every line whose deadline has passed, in order
    pub fn poll(&mut self, now: Instant) -> Vec<HistoryLine> {
        let mut lines = Vec::new();

        while let BootState::Pending { next, due } = self.state {
            if now < due {
                break;
            }
            let step = &self.steps[next];
            debug!("Boot step {}/{}", next + 1, self.steps.len());
            lines.push(HistoryLine::new(step.kind, step.content.clone()));

            self.state = match self.steps.get(next + 1) {
                Some(following) => BootState::Pending {
                    next: next + 1,
                    due: due + following.delay,
                },
                None => BootState::Finished,
            };
        }

        lines
    }

    /// When the next line becomes due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            BootState::Pending { due, .. } => Some(due),
            _ => None,
        }
    }

    /// Invalidate every pending step
    pub fn cancel(&mut self) {
        if let BootState::Pending { next, .. } = self.state {
            debug!("Boot sequence cancelled with {} steps pending", self.steps.len() - next);
            self.state = BootState::Cancelled;
        }
    }

    /// Whether lines are still scheduled
    pub fn is_running(&self) -> bool {
        matches!(self.state, BootState::Pending { .. })
    }

    #[allow(dead_code)]
    pub fn is_cancelled(&self) -> bool {
        self.state == BootState::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_default_sequence_shape() {
        let steps = default_boot_steps();
        assert_eq!(steps.len(), 7);
        for step in &steps {
            assert!(step.delay >= ms(200) && step.delay <= ms(1800));
        }
    }

    #[test]
    fn test_full_playback_order() {
        let t0 = Instant::now();
        let steps = default_boot_steps();
        let total: Duration = steps.iter().map(|s| s.delay).sum();
        let mut boot = BootSequencer::start(steps.clone(), t0);

        let lines = boot.poll(t0 + total);

        assert_eq!(lines.len(), 7);
        for (line, step) in lines.iter().zip(steps.iter()) {
            assert_eq!(line.kind, step.kind);
            assert_eq!(line.content, step.content);
        }
        assert!(!boot.is_running());
        assert!(boot.poll(t0 + total + ms(5000)).is_empty());
    }

    #[test]
    fn test_no_line_before_cumulative_delay() {
        let t0 = Instant::now();
        let steps = default_boot_steps();
        let mut boot = BootSequencer::start(steps.clone(), t0);

        let mut elapsed = Duration::ZERO;
        for step in &steps {
            elapsed += step.delay;
            assert!(boot.poll(t0 + elapsed - ms(1)).is_empty());
            assert_eq!(boot.next_deadline(), Some(t0 + elapsed));

            let lines = boot.poll(t0 + elapsed);
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].content, step.content);
        }
        assert_eq!(boot.next_deadline(), None);
    }

    #[test]
    fn test_delays_chain_from_previous_deadline() {
        let t0 = Instant::now();
        let steps = vec![
            BootStep::new(LineKind::System, "a", 200),
            BootStep::new(LineKind::System, "b", 300),
        ];
        let mut boot = BootSequencer::start(steps, t0);

        // Polled late: the second step is still due 300ms after the first deadline
        assert_eq!(boot.poll(t0 + ms(450)).len(), 1);
        assert_eq!(boot.next_deadline(), Some(t0 + ms(500)));
        assert_eq!(boot.poll(t0 + ms(500))[0].content, "b");
    }

    #[test]
    fn test_cancel_drops_pending_steps() {
        let t0 = Instant::now();
        let mut boot = BootSequencer::start(default_boot_steps(), t0);

        assert_eq!(boot.poll(t0 + ms(300)).len(), 1);
        boot.cancel();

        assert!(boot.is_cancelled());
        assert!(!boot.is_running());
        assert_eq!(boot.next_deadline(), None);
        assert!(boot.poll(t0 + ms(60_000)).is_empty());
    }

    #[test]
    fn test_empty_sequence_is_finished() {
        let mut boot = BootSequencer::start(Vec::new(), Instant::now());
        assert!(!boot.is_running());
        assert!(boot.poll(Instant::now()).is_empty());

        let mut done = BootSequencer::finished();
        done.cancel();
        assert!(!done.is_cancelled());
    }
}
