use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct DecodeError(#[from] serde_json::Error);

impl DecodeError {
    /// True when the text was not JSON at all, as opposed to JSON of the wrong shape.
    pub fn is_syntax(&self) -> bool {
        matches!(self.0.classify(), Category::Syntax | Category::Eof)
    }
}

/// How the verifier turns payload text into typed values.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// Empty and malformed text both collapse to the default instance.
    OrDefault,
    /// Malformed text is an error.
    Strict,
}

impl Default for DecodeMode {
    fn default() -> Self {
        DecodeMode::OrDefault
    }
}

/// A typed `request_detail` / `extra_info` payload carried as JSON text.
///
/// Empty text always means "absent" and decodes to `Default` in both modes.
/// `decode_or_default` cannot tell absent from malformed input; callers that
/// need the distinction use `decode_strict`. `DecodeMode::OrDefault` only
/// forgives text that is not JSON at all: JSON of the wrong shape, such as an
/// unknown enum code or a list where an object belongs, is still an error.
pub trait Payload: Serialize + DeserializeOwned + Default {
    fn decode_strict(text: &str) -> Result<Self, DecodeError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    fn decode_or_default(text: &str) -> Self {
        Self::decode_strict(text).unwrap_or_default()
    }

    fn decode(text: &str, mode: DecodeMode) -> Result<Self, DecodeError> {
        match mode {
            DecodeMode::Strict => Self::decode_strict(text),
            DecodeMode::OrDefault => match Self::decode_strict(text) {
                Err(e) if e.is_syntax() => Ok(Self::default()),
                other => other,
            },
        }
    }

    fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    #[serde(default)]
    struct Probe {
        n: u32,
        s: String,
    }

    impl Payload for Probe {}

    #[test]
    fn test_empty_is_default_in_both_modes() {
        assert_eq!(Probe::decode("", DecodeMode::Strict).unwrap(), Probe::default());
        assert_eq!(Probe::decode("", DecodeMode::OrDefault).unwrap(), Probe::default());
        assert_eq!(Probe::decode_strict("   ").unwrap(), Probe::default());
    }

    #[test]
    fn test_malformed_depends_on_mode() {
        assert_eq!(Probe::decode_or_default("{not json"), Probe::default());
        let err = Probe::decode("{not json", DecodeMode::Strict).unwrap_err();
        assert!(err.is_syntax());

        let err = Probe::decode_strict(r#"{"n": "seven"}"#).unwrap_err();
        assert!(!err.is_syntax());
        assert!(Probe::decode(r#"{"n": "seven"}"#, DecodeMode::OrDefault).is_err());
        assert!(Probe::decode("[1, 2, 3]", DecodeMode::OrDefault).is_err());
        assert_eq!(Probe::decode("{not json", DecodeMode::OrDefault).unwrap(), Probe::default());
    }

    #[test]
    fn test_encode() {
        let p = Probe { n: 7, s: "x".to_owned() };
        assert_eq!(p.encode(), r#"{"n":7,"s":"x"}"#);
        assert_eq!(Probe::decode_strict(&p.encode()).unwrap(), p);
    }
}
