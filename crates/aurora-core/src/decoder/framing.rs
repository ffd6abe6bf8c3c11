//! Frame synchronization: where the next byte goes.
//!
//! The decision depends only on the current state, the byte, and how many
//! bytes of the frame are already buffered; validation happens elsewhere.

use crate::protocol::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FrameState {
    /// Nothing buffered; waiting for a sync byte.
    #[default]
    Idle,
    /// Sync byte buffered; the next byte is the length field.
    AwaitingLength,
    /// Length known; buffering until `expected_len` bytes are held.
    Accumulating { expected_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Byte dropped while idle.
    Ignored,
    /// Byte opens a new frame.
    Started,
    /// Byte appended to the frame in progress.
    Buffered,
    /// Byte appended and the frame is complete.
    Completed,
}

impl FrameState {
    /// Advance by one byte. `buffered` is the frame length before this byte.
    pub(crate) fn advance(self, byte: u8, buffered: usize) -> (FrameState, Transition) {
        match self {
            FrameState::Idle if byte == layout::SYNC => {
                (FrameState::AwaitingLength, Transition::Started)
            }
            FrameState::Idle => (FrameState::Idle, Transition::Ignored),
            FrameState::AwaitingLength => (
                FrameState::Accumulating {
                    expected_len: layout::frame_len(byte),
                },
                Transition::Buffered,
            ),
            FrameState::Accumulating { expected_len } if buffered + 1 >= expected_len => {
                (FrameState::Idle, Transition::Completed)
            }
            state @ FrameState::Accumulating { .. } => (state, Transition::Buffered),
        }
    }

    pub(crate) fn expected_len(self) -> Option<usize> {
        match self {
            FrameState::Accumulating { expected_len } => Some(expected_len),
            _ => None,
        }
    }
}
