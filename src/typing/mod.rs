//! Voice-to-keyboard typing
//!
//! Consumes normalized recognizer results and types only the text that newly
//! appeared since the last commit, so overlapping partial hypotheses never
//! duplicate characters at the cursor.

mod engine;
mod input;

pub use engine::TypingEngine;
pub use input::{DebugSink, InputMethod, TextSink, TypingError, TypingInput};
