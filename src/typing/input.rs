//! Keyboard injection using enigo
//!
//! Two ways to put text at the current input focus:
//! - **Direct**: enigo's native text input (default)
//! - **Clipboard**: copy then Cmd/Ctrl+V, falls back to direct on failure
//!
//! In debug mode [`DebugSink`] replaces the keyboard entirely and just logs
//! what would have been typed.

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::thread;
use std::time::Duration;

/// Input method for typing text
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InputMethod {
    #[default]
    Direct,
    Clipboard,
}

impl InputMethod {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "clipboard" => InputMethod::Clipboard,
            _ => InputMethod::Direct,
        }
    }
}

/// Error type for typing operations
#[derive(Debug)]
pub enum TypingError {
    Enigo(String),
    Clipboard(String),
}

impl std::fmt::Display for TypingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypingError::Enigo(msg) => write!(f, "Enigo error: {}", msg),
            TypingError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
        }
    }
}

impl std::error::Error for TypingError {}

/// Destination for committed text. The engine only ever appends through this
/// seam, so debug logging and test capture swap in without touching the
/// commit logic.
pub trait TextSink {
    fn inject(&mut self, text: &str) -> Result<(), TypingError>;
}

/// Logs committed text instead of typing it.
pub struct DebugSink;

impl TextSink for DebugSink {
    fn inject(&mut self, text: &str) -> Result<(), TypingError> {
        println!("[DEBUG] Would type: {:?}", text);
        Ok(())
    }
}

/// Keyboard input handler using enigo
pub struct TypingInput {
    enigo: Enigo,
    clipboard: Clipboard,
    method: InputMethod,
}

impl TypingInput {
    pub fn new(method: InputMethod) -> Result<Self, TypingError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| TypingError::Enigo(format!("Failed to initialize Enigo: {}", e)))?;
        let clipboard = Clipboard::new()
            .map_err(|e| TypingError::Clipboard(format!("Failed to initialize clipboard: {}", e)))?;

        Ok(Self {
            enigo,
            clipboard,
            method,
        })
    }

    fn type_direct(&mut self, text: &str) -> Result<(), TypingError> {
        self.enigo
            .text(text)
            .map_err(|e| TypingError::Enigo(format!("Failed to type text: {}", e)))
    }

    /// Copy to the clipboard and paste, restoring the previous clipboard
    /// content afterward (best effort).
    fn type_via_clipboard(&mut self, text: &str) -> Result<(), TypingError> {
        let old_content = self.clipboard.get_text().ok();

        self.clipboard
            .set_text(text)
            .map_err(|e| TypingError::Clipboard(format!("Failed to set clipboard: {}", e)))?;
        // Clipboard needs a moment before the paste lands
        thread::sleep(Duration::from_millis(50));

        let result = self.send_paste();
        thread::sleep(Duration::from_millis(100));

        if let Some(old) = old_content {
            let _ = self.clipboard.set_text(old);
        }
        result
    }

    /// Cmd+V on macOS, Ctrl+V elsewhere
    fn send_paste(&mut self) -> Result<(), TypingError> {
        #[cfg(target_os = "macos")]
        let modifier = Key::Meta;
        #[cfg(not(target_os = "macos"))]
        let modifier = Key::Control;

        self.enigo
            .key(modifier, Direction::Press)
            .map_err(|e| TypingError::Enigo(format!("Failed to press modifier: {}", e)))?;
        thread::sleep(Duration::from_millis(10));
        self.enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|e| TypingError::Enigo(format!("Failed to click key: {}", e)))?;
        thread::sleep(Duration::from_millis(50));
        self.enigo
            .key(modifier, Direction::Release)
            .map_err(|e| TypingError::Enigo(format!("Failed to release modifier: {}", e)))
    }
}

impl TextSink for TypingInput {
    fn inject(&mut self, text: &str) -> Result<(), TypingError> {
        if text.is_empty() {
            return Ok(());
        }
        match self.method {
            InputMethod::Direct => self.type_direct(text),
            InputMethod::Clipboard => match self.type_via_clipboard(text) {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("[TYPING] Clipboard method failed: {}, trying direct", e);
                    self.type_direct(text)
                }
            },
        }
    }
}
