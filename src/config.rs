use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub typing: TypingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

// ============================================================================
// Backend Config
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct BackendConfig {
    /// Websocket endpoint of the streaming recognizer
    #[serde(default = "default_url")]
    pub url: String,
    /// Sent as a bearer token on the handshake when present
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
        }
    }
}

fn default_url() -> String {
    "ws://127.0.0.1:8090/v1/stream".into()
}

// ============================================================================
// Typing Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TypingConfig {
    /// Input method: "direct" or "clipboard"
    #[serde(default = "default_method")]
    pub method: String,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
        }
    }
}

fn default_method() -> String {
    "direct".into()
}

// ============================================================================
// Session Config
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SessionConfig {
    /// Log committed text instead of typing it
    #[serde(default)]
    pub debug: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new("voxcursor.toml"));
        if path.exists() {
            fs::read_to_string(path)
                .ok()
                .and_then(|s| toml::from_str(&s).ok())
                .unwrap_or_default()
        } else {
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.url, "ws://127.0.0.1:8090/v1/stream");
        assert_eq!(config.backend.api_key, None);
        assert_eq!(config.typing.method, "direct");
        assert!(!config.session.debug);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            url = "wss://stt.example.com/stream"
            api_key = "secret"

            [session]
            debug = true
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "wss://stt.example.com/stream");
        assert_eq!(config.backend.api_key.as_deref(), Some("secret"));
        assert_eq!(config.typing.method, "direct");
        assert!(config.session.debug);
    }
}
