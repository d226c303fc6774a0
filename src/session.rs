//! Transcription session - the bidirectional exchange with the recognizer
//!
//! Feeds buffered audio frames out over a websocket and turns the inbound
//! hypothesis stream into normalized [`SpeechResult`]s for the typing
//! engine, in delivery order. Any transport or backend failure is
//! session-fatal: it is logged by the caller and funnels into the shared
//! shutdown flag, never retried.

use crate::buffer::FrameReader;
use crate::config::BackendConfig;
use crate::protocol::{RecognizeResponse, StartMessage};
use crate::state::SharedState;
use crate::typing::TypingEngine;
use anyhow::Context;
use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use std::time::{Duration, Instant};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// How often the receive loop re-checks the shutdown flag while idle.
const RECV_POLL: Duration = Duration::from_millis(250);

/// One recognizer hypothesis for the current utterance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub stability: f32,
    pub is_final: bool,
}

/// A hypothesis stamped with its receive time.
#[derive(Clone, Debug)]
pub struct SpeechResult {
    pub received: Instant,
    pub transcript: Transcript,
}

/// Map a raw backend response to a result the engine can consume.
///
/// A response with no results or alternatives becomes an empty transcript:
/// an explicit no-signal tick the engine treats as a no-op, not an error.
pub fn normalize(response: &RecognizeResponse, received: Instant) -> SpeechResult {
    let transcript = response
        .results
        .first()
        .and_then(|result| {
            result.alternatives.first().map(|alt| Transcript {
                text: alt.transcript.clone(),
                stability: result.stability,
                is_final: result.is_final,
            })
        })
        .unwrap_or_default();

    SpeechResult {
        received,
        transcript,
    }
}

/// Run the streaming exchange to completion.
///
/// Blocks the calling thread; the tokio runtime lives only inside this call.
pub fn run_session(
    backend: &BackendConfig,
    frames: FrameReader,
    engine: &mut TypingEngine,
    state: SharedState,
    debug: bool,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(stream_loop(backend, frames, engine, state, debug))
}

async fn stream_loop(
    backend: &BackendConfig,
    frames: FrameReader,
    engine: &mut TypingEngine,
    state: SharedState,
    debug: bool,
) -> anyhow::Result<()> {
    let mut request = backend.url.as_str().into_client_request()?;
    if let Some(key) = &backend.api_key {
        request.headers_mut().insert(
            "Authorization",
            format!("Bearer {}", key)
                .parse()
                .context("invalid api_key")?,
        );
    }

    let (ws, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(request))
        .await
        .context("timed out connecting to recognizer")??;
    let (mut outbound, mut inbound) = ws.split();

    let start = serde_json::to_string(&StartMessage::linear16())?;
    outbound.send(Message::text(start)).await?;

    // One outbound binary message per consumed frame; ends with a Close
    // frame when the frame sequence terminates (buffer closed or shutdown).
    let feeder = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if outbound.send(Message::binary(frame)).await.is_err() {
                return;
            }
        }
        let _ = outbound.send(Message::Close(None)).await;
    });

    let result: anyhow::Result<()> = async {
        loop {
            if state.is_shutdown() {
                return Ok(());
            }
            let message = match tokio::time::timeout(RECV_POLL, inbound.next()).await {
                Err(_) => continue,
                Ok(None) => return Ok(()),
                Ok(Some(message)) => message?,
            };
            match message {
                Message::Text(payload) => {
                    let received = Instant::now();
                    // Malformed payloads degrade to a no-signal tick.
                    let response: RecognizeResponse =
                        serde_json::from_str(payload.as_str()).unwrap_or_default();
                    if debug && response.results.is_empty() {
                        eprintln!(
                            "[DEBUG] {} empty response tick",
                            Local::now().format("%H:%M:%S%.3f")
                        );
                    }
                    engine.handle(normalize(&response, received))?;
                }
                Message::Close(_) => return Ok(()),
                _ => {}
            }
        }
    }
    .await;

    feeder.abort();
    result
}
