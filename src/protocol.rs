//! Wire format for the streaming recognizer
//!
//! One JSON config message opens the stream, followed by binary PCM frames.
//! Inbound text messages carry zero or more results; only the first result's
//! first alternative is used downstream. Missing fields deserialize to
//! defaults so a sparse response degrades instead of erroring.

use serde::{Deserialize, Serialize};

pub const SAMPLE_RATE_HERTZ: u32 = 16000;
const ENCODING: &str = "linear16";
const LANGUAGE_CODE: &str = "en-US";

/// First message on the stream.
#[derive(Debug, Serialize)]
pub struct StartMessage {
    pub config: StreamingConfig,
}

#[derive(Debug, Serialize)]
pub struct StreamingConfig {
    pub sample_rate_hertz: u32,
    pub encoding: &'static str,
    pub language_code: &'static str,
    pub enable_automatic_punctuation: bool,
    pub interim_results: bool,
}

impl StartMessage {
    pub fn linear16() -> Self {
        Self {
            config: StreamingConfig {
                sample_rate_hertz: SAMPLE_RATE_HERTZ,
                encoding: ENCODING,
                language_code: LANGUAGE_CODE,
                enable_automatic_punctuation: false,
                interim_results: true,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default)]
    pub results: Vec<RecognizeResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecognizeResult {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub stability: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub transcript: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_message_requests_interim_results_without_punctuation() {
        let json = serde_json::to_value(StartMessage::linear16()).unwrap();
        let config = &json["config"];
        assert_eq!(config["sample_rate_hertz"], 16000);
        assert_eq!(config["encoding"], "linear16");
        assert_eq!(config["enable_automatic_punctuation"], false);
        assert_eq!(config["interim_results"], true);
    }

    #[test]
    fn sparse_response_fills_defaults() {
        let response: RecognizeResponse =
            serde_json::from_str(r#"{"results":[{"alternatives":[{"transcript":"hi"}]}]}"#)
                .unwrap();
        let result = &response.results[0];
        assert_eq!(result.alternatives[0].transcript, "hi");
        assert!(!result.is_final);
        assert_eq!(result.stability, 0.0);
    }

    #[test]
    fn empty_object_is_a_valid_no_signal_response() {
        let response: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }
}
