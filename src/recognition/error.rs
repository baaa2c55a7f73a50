//! Recognition error vocabulary and payload normalization
//!
//! Engines report failures as JSON objects, JSON embedded in strings, raw platform
//! messages or bare code tokens. Everything is folded into one [`RecognitionError`]
//! here so the session logic only ever sees a typed code.

use std::fmt;

use serde_json::Value;

/// Whether a recognition failure ends recognition for the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Permission or engine-level failure; not retried
    Hard,
    /// Recoverable by retrying or moving on
    Soft,
}

/// Error codes reported by recognition engines
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    PermissionDenied,
    InsufficientPermissions,
    StartFailed,
    AlreadyListening,
    ClassNotFound,
    MissingCommand,
    EngineUnavailable,
    EngineCreateFailed,
    NoMatch,
    SpeechTimeout,
    InitOptionsError,
    /// Result payload that could not be interpreted
    MalformedPayload,
    /// No code could be extracted
    Unknown,
    /// Engine-specific code outside the known vocabulary (e.g. `ERROR_7`)
    Other(String),
}

impl ErrorCode {
    /// Parse a code token; blank input is `Unknown`
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "" | "UNKNOWN" => Self::Unknown,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "INSUFFICIENT_PERMISSIONS" => Self::InsufficientPermissions,
            "START_FAILED" => Self::StartFailed,
            "ALREADY_LISTENING" => Self::AlreadyListening,
            "CLASS_NOT_FOUND" => Self::ClassNotFound,
            "MISSING_COMMAND" => Self::MissingCommand,
            "ENGINE_UNAVAILABLE" => Self::EngineUnavailable,
            "ENGINE_CREATE_FAILED" => Self::EngineCreateFailed,
            "NO_MATCH" => Self::NoMatch,
            "SPEECH_TIMEOUT" => Self::SpeechTimeout,
            "INIT_OPTIONS_ERROR" => Self::InitOptionsError,
            "MALFORMED_PAYLOAD" => Self::MalformedPayload,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire name of the code
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::StartFailed => "START_FAILED",
            Self::AlreadyListening => "ALREADY_LISTENING",
            Self::ClassNotFound => "CLASS_NOT_FOUND",
            Self::MissingCommand => "MISSING_COMMAND",
            Self::EngineUnavailable => "ENGINE_UNAVAILABLE",
            Self::EngineCreateFailed => "ENGINE_CREATE_FAILED",
            Self::NoMatch => "NO_MATCH",
            Self::SpeechTimeout => "SPEECH_TIMEOUT",
            Self::InitOptionsError => "INIT_OPTIONS_ERROR",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::Unknown => "UNKNOWN",
            Self::Other(code) => code,
        }
    }

    /// Classify the code
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::PermissionDenied
            | Self::InsufficientPermissions
            | Self::StartFailed
            | Self::AlreadyListening
            | Self::ClassNotFound
            | Self::MissingCommand
            | Self::EngineUnavailable
            | Self::EngineCreateFailed => Severity::Hard,
            Self::NoMatch
            | Self::SpeechTimeout
            | Self::InitOptionsError
            | Self::MalformedPayload
            | Self::Unknown
            | Self::Other(_) => Severity::Soft,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognition failure with a typed code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RecognitionError {
    /// Normalized error code
    pub code: ErrorCode,
    /// Human-readable detail from the engine
    pub message: String,
}

impl RecognitionError {
    /// Create an error from a code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A result payload that could not be interpreted
    #[must_use]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedPayload, detail)
    }

    /// Classify the error
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Whether the error disables recognition for the rest of the round
    #[must_use]
    pub const fn is_hard(&self) -> bool {
        matches!(self.severity(), Severity::Hard)
    }

    /// Normalize a raw error string from an engine bridge
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.starts_with('{') || trimmed.starts_with('"') {
            if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
                return Self::from_value(&value);
            }
        }

        // Platform messages from a bridge that is not installed
        if trimmed.contains("Class not found") {
            return Self::new(ErrorCode::ClassNotFound, trimmed);
        }
        if trimmed.contains("Missing Command Error") {
            return Self::new(ErrorCode::MissingCommand, trimmed);
        }

        if is_code_token(trimmed) {
            return Self::new(ErrorCode::parse(trimmed), "recognition error");
        }

        Self::new(ErrorCode::Unknown, trimmed)
    }

    /// Normalize a structured error value
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let code = map
                    .get("code")
                    .and_then(Value::as_str)
                    .map_or(ErrorCode::Unknown, ErrorCode::parse);
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| value.to_string(), ToString::to_string);
                Self::new(code, message)
            }
            Value::String(s) => Self::from_raw(s),
            Value::Null => Self::new(ErrorCode::Unknown, "no error detail"),
            other => Self::new(ErrorCode::Unknown, other.to_string()),
        }
    }
}

/// `SCREAMING_SNAKE` tokens such as `NO_MATCH` or `ERROR_7`
fn is_code_token(s: &str) -> bool {
    !s.is_empty()
        && s.starts_with(|c: char| c.is_ascii_uppercase())
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
