//! FIFO between the hardware capture callback and the streaming session
//!
//! The writer side lives inside the cpal callback and must never block, so
//! the buffer is an unbounded flume channel with a closed flag on top.

use crate::state::SharedState;
use flume::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One captured audio frame: 16 kHz mono 16-bit PCM, little-endian bytes.
pub type AudioFrame = Vec<u8>;

const POLL_WAIT: Duration = Duration::from_millis(10);

pub struct AudioFrameBuffer {
    tx: Sender<AudioFrame>,
    rx: Receiver<AudioFrame>,
    closed: Arc<AtomicBool>,
    state: SharedState,
}

impl AudioFrameBuffer {
    pub fn new(state: SharedState) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            tx,
            rx,
            closed: Arc::new(AtomicBool::new(false)),
            state,
        }
    }

    /// Handle for the capture callback. Cheap to clone into the closure.
    pub fn writer(&self) -> FrameWriter {
        FrameWriter {
            tx: self.tx.clone(),
            closed: Arc::clone(&self.closed),
            state: Arc::clone(&self.state),
        }
    }

    /// Consuming side, handed to the streaming session.
    pub fn reader(&self) -> FrameReader {
        FrameReader {
            rx: self.rx.clone(),
            closed: Arc::clone(&self.closed),
            state: Arc::clone(&self.state),
        }
    }

    /// Mark the buffer closed. Idempotent. Frames already enqueued are still
    /// delivered; new ones are discarded.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct FrameWriter {
    tx: Sender<AudioFrame>,
    closed: Arc<AtomicBool>,
    state: SharedState,
}

impl FrameWriter {
    /// Append a frame. No-op after close or shutdown; never blocks, so it is
    /// safe to call from the audio callback.
    pub fn enqueue(&self, frame: AudioFrame) {
        if self.closed.load(Ordering::SeqCst) || self.state.is_shutdown() {
            return;
        }
        let _ = self.tx.send(frame);
    }
}

pub struct FrameReader {
    rx: Receiver<AudioFrame>,
    closed: Arc<AtomicBool>,
    state: SharedState,
}

impl FrameReader {
    /// Async variant of [`Iterator::next`] for the websocket feed task.
    pub async fn recv(&self) -> Option<AudioFrame> {
        loop {
            if self.state.is_shutdown() {
                return None;
            }
            match self.rx.try_recv() {
                Ok(frame) => return Some(frame),
                Err(TryRecvError::Empty) => {
                    if self.closed.load(Ordering::SeqCst) {
                        return None;
                    }
                    tokio::time::sleep(POLL_WAIT).await;
                }
                Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}

impl Iterator for FrameReader {
    type Item = AudioFrame;

    /// Pop the oldest frame, waiting briefly when the buffer is empty.
    /// Terminates on shutdown, or once the buffer is closed and drained.
    fn next(&mut self) -> Option<AudioFrame> {
        loop {
            if self.state.is_shutdown() {
                return None;
            }
            match self.rx.try_recv() {
                Ok(frame) => return Some(frame),
                Err(TryRecvError::Empty) => {
                    if self.closed.load(Ordering::SeqCst) {
                        return None;
                    }
                    std::thread::sleep(POLL_WAIT);
                }
                Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}
