//! Real-time voice dictation: microphone frames in, incremental keystrokes
//! out at the current input focus.

pub mod buffer;
pub mod capture;
pub mod config;
pub mod monitor;
pub mod protocol;
pub mod session;
pub mod state;
pub mod typing;
