//! Incremental typing engine
//!
//! Turns the recognizer's overlapping hypotheses into keystrokes, emitting
//! only the suffix that newly appeared since the last commit. Already-typed
//! characters are never retyped and never rolled back.

use super::input::{TextSink, TypingError};
use crate::session::SpeechResult;
use crate::state::SharedState;
use chrono::Local;
use std::time::{Duration, Instant};

/// Minimum gap between committed partials.
pub const TYPE_INTERVAL: Duration = Duration::from_secs(1);
/// Partials below this stability are likely to be revised; wait for better.
pub const STABILITY_THRESHOLD: f32 = 0.7;

/// Diff baseline for the current utterance. Rebuilt after every final
/// hypothesis, since the recognizer starts a fresh utterance afterward.
struct TypeState {
    last_commit: Instant,
    last_typed: String,
}

impl TypeState {
    fn new(now: Instant) -> Self {
        Self {
            last_commit: now,
            last_typed: String::new(),
        }
    }
}

pub struct TypingEngine {
    sink: Box<dyn TextSink>,
    state: TypeState,
    shared: SharedState,
    debug: bool,
}

impl TypingEngine {
    pub fn new(sink: Box<dyn TextSink>, shared: SharedState, debug: bool) -> Self {
        Self {
            sink,
            state: TypeState::new(Instant::now()),
            shared,
            debug,
        }
    }

    /// Process one normalized recognizer result.
    ///
    /// Finals always commit; partials commit only when both the interval and
    /// the stability gates pass. On commit the case-insensitive common prefix
    /// with the baseline is skipped and only the remainder is injected, with
    /// one trailing space separating consecutive commits.
    pub fn handle(&mut self, result: SpeechResult) -> Result<(), TypingError> {
        if self.shared.is_shutdown() || result.transcript.text.is_empty() {
            return Ok(());
        }

        if self.debug {
            eprintln!(
                "[DEBUG] {} [Result] {:?}",
                Local::now().format("%H:%M:%S%.3f"),
                result.transcript
            );
        }

        let now = result.received;
        let should_commit = result.transcript.is_final
            || (now.saturating_duration_since(self.state.last_commit) >= TYPE_INTERVAL
                && result.transcript.stability > STABILITY_THRESHOLD);

        let candidate = result.transcript.text.trim();
        // A whitespace-only hypothesis must not wipe the baseline.
        if should_commit && !candidate.is_empty() {
            let prefix_len = common_prefix_len(candidate, &self.state.last_typed);
            let suffix = candidate[prefix_len..].trim_start();

            if !suffix.is_empty() {
                self.sink.inject(&format!("{} ", suffix))?;
                self.shared.mark_activity();
                self.state.last_commit = now;
            }
            // The baseline tracks the latest committed hypothesis even when
            // nothing new was typed, so a shortened correction doesn't leave
            // a stale longer baseline behind.
            self.state.last_typed = candidate.to_string();
        }

        // Diff happens above, against the pre-reset baseline: a final that
        // repeats already-typed text must not re-emit it.
        if result.transcript.is_final {
            self.state = TypeState::new(now);
        }

        Ok(())
    }
}

/// Byte length of the case-insensitive common character prefix.
fn common_prefix_len(current: &str, previous: &str) -> usize {
    let mut prev = previous.chars();
    let mut len = 0;
    for c in current.chars() {
        match prev.next() {
            Some(p) if c.to_lowercase().eq(p.to_lowercase()) => len += c.len_utf8(),
            _ => break,
        }
    }
    len
}
