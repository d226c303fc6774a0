//! End-to-end pipeline tests: raw recognizer responses through
//! normalization into the typing engine, checking exactly what lands at
//! the cursor.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use voxcursor::protocol::RecognizeResponse;
use voxcursor::session::normalize;
use voxcursor::state::RuntimeState;
use voxcursor::typing::{TextSink, TypingEngine, TypingError};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn typed(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl TextSink for Recorder {
    fn inject(&mut self, text: &str) -> Result<(), TypingError> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn response(json: &str) -> RecognizeResponse {
    serde_json::from_str(json).unwrap()
}

/// A base instant far enough past engine construction that the first
/// partial clears the interval gate.
fn base() -> Instant {
    Instant::now() + Duration::from_secs(10)
}

#[test]
fn raw_response_sequence_types_each_suffix_once() {
    let recorder = Recorder::default();
    let state = RuntimeState::new();
    let mut engine = TypingEngine::new(Box::new(recorder.clone()), Arc::clone(&state), false);
    let t0 = base();

    let payloads = [
        (
            r#"{"results":[{"alternatives":[{"transcript":"hell"}],"stability":0.9}]}"#,
            0,
        ),
        (
            r#"{"results":[{"alternatives":[{"transcript":"hello world"}],"stability":0.9}]}"#,
            1100,
        ),
        (
            r#"{"results":[{"alternatives":[{"transcript":"hello world."}],"is_final":true,"stability":0.95}]}"#,
            1200,
        ),
    ];

    for (json, offset_ms) in payloads {
        let at = t0 + Duration::from_millis(offset_ms);
        engine.handle(normalize(&response(json), at)).unwrap();
    }

    assert_eq!(recorder.typed(), vec!["hell ", "o world ", ". "]);
}

#[test]
fn empty_and_malformed_responses_are_silent_ticks() {
    let recorder = Recorder::default();
    let state = RuntimeState::new();
    let mut engine = TypingEngine::new(Box::new(recorder.clone()), Arc::clone(&state), false);
    let t0 = base();

    engine
        .handle(normalize(&response("{}"), t0))
        .unwrap();
    // Unknown shapes deserialize to defaults rather than erroring.
    engine
        .handle(normalize(&response(r#"{"results":[{}]}"#), t0))
        .unwrap();
    engine
        .handle(normalize(
            &response(r#"{"results":[{"alternatives":[{"transcript":"hi there"}],"is_final":true}]}"#),
            t0 + Duration::from_millis(100),
        ))
        .unwrap();

    assert_eq!(recorder.typed(), vec!["hi there "]);
    assert!(!state.is_shutdown());
}
