//! Liveness monitor - shuts the session down after sustained silence
//!
//! The only automatic termination path: with nothing committed for
//! `SILENCE_THRESHOLD`, an unattended session should not keep listening
//! forever.

use crate::state::SharedState;
use std::time::Duration;

pub const SILENCE_THRESHOLD: Duration = Duration::from_secs(3);
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

pub fn run_monitor(state: SharedState, silence: Duration, poll: Duration, debug: bool) {
    while !state.is_shutdown() {
        if state.since_activity() > silence {
            if debug {
                eprintln!(
                    "[DEBUG] No activity for {:.1}s. Shutting down...",
                    silence.as_secs_f32()
                );
            }
            state.request_shutdown();
            break;
        }
        std::thread::sleep(poll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RuntimeState;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn silence_triggers_shutdown_within_threshold_plus_poll() {
        let state = RuntimeState::new();
        let monitor_state = Arc::clone(&state);
        let handle = thread::spawn(move || {
            run_monitor(
                monitor_state,
                Duration::from_millis(100),
                Duration::from_millis(20),
                false,
            );
        });

        thread::sleep(Duration::from_millis(250));
        assert!(state.is_shutdown());
        handle.join().unwrap();
    }

    #[test]
    fn activity_defers_the_timeout() {
        let state = RuntimeState::new();
        let monitor_state = Arc::clone(&state);
        let handle = thread::spawn(move || {
            run_monitor(
                monitor_state,
                Duration::from_millis(200),
                Duration::from_millis(20),
                false,
            );
        });

        for _ in 0..5 {
            thread::sleep(Duration::from_millis(50));
            state.mark_activity();
        }
        assert!(!state.is_shutdown());

        // Stop marking and the timeout fires.
        thread::sleep(Duration::from_millis(400));
        assert!(state.is_shutdown());
        handle.join().unwrap();
    }

    #[test]
    fn monitor_exits_when_shutdown_arrives_from_elsewhere() {
        let state = RuntimeState::new();
        state.request_shutdown();
        // Returns immediately instead of waiting out the threshold.
        run_monitor(
            Arc::clone(&state),
            Duration::from_secs(60),
            Duration::from_millis(10),
            false,
        );
    }
}
