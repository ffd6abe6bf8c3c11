use thiserror::Error;

use super::role::Role;

/// Errors raised while validating or building frames.
///
/// Inside the streaming decoder every variant is recoverable: the group in
/// flight is dropped and the decoder waits for the next sync byte.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("missing sync byte: frame starts with {found:#04x}")]
    MissingSync { found: u8 },
    #[error("frame length mismatch: header declares {declared} bytes, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("checksum invalid: frame carries {expected:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { expected: u8, computed: u8 },
    #[error("invalid packet order: {role} frame with {pending} pending holds")]
    OrderingViolation { role: Role, pending: usize },
    #[error("too many holds for one frame: {count} (max {max})")]
    TooManyHolds { count: usize, max: usize },
}

impl FrameError {
    /// Stable identifier used in reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::TooShort { .. } => "too-short",
            FrameError::MissingSync { .. } => "missing-sync",
            FrameError::LengthMismatch { .. } => "length-mismatch",
            FrameError::ChecksumMismatch { .. } => "checksum",
            FrameError::OrderingViolation { .. } => "ordering",
            FrameError::TooManyHolds { .. } => "too-many-holds",
        }
    }
}
