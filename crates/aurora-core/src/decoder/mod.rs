//! Streaming decoder for the data-transfer characteristic.
//!
//! Bytes arrive in write order, one chunk at a time, with no guarantee that
//! a chunk boundary matches a frame boundary. The decoder resynchronizes on
//! the sync byte, validates each complete frame, and accumulates holds across
//! the frames of a group until the closing frame makes the batch available.
//!
//! Invariants:
//! - The frame buffer never holds more bytes than the announced length.
//! - Holds are pending only between a validated first frame and the end
//!   (or failure) of its group.
//! - A ready batch is released in exactly one place: when the consumer takes
//!   it or when the next frame starts.
//!
//! No input can make the decoder panic or wedge; a rejected frame drops the
//! whole group and the decoder waits for the next sync byte.

mod framing;

use tracing::{debug, warn};

use crate::Hold;
use crate::protocol::error::FrameError;
use crate::protocol::parser::parse_frame;
use crate::protocol::role::Role;
use framing::{FrameState, Transition};

/// Observable effect of feeding one byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A hold from a validated frame joined the pending group.
    HoldAppended(Hold),
    /// A frame passed validation.
    FrameAccepted(Role),
    /// The group is complete and its holds can be taken.
    BatchReady { holds: usize },
    /// A frame failed validation; the pending group was dropped.
    FrameRejected(FrameError),
}

#[derive(Debug, Default)]
pub struct PacketDecoder {
    state: FrameState,
    buffer: Vec<u8>,
    holds: Vec<Hold>,
    batch_ready: bool,
}

impl PacketDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte, discarding the effects.
    pub fn feed(&mut self, byte: u8) {
        let _ = self.step(byte);
    }

    /// Feed one byte and report what it caused.
    pub fn step(&mut self, byte: u8) -> Vec<DecodeEvent> {
        let (next, transition) = self.state.advance(byte, self.buffer.len());
        self.state = next;
        match transition {
            Transition::Ignored => Vec::new(),
            Transition::Started => {
                self.release_batch();
                self.buffer.push(byte);
                Vec::new()
            }
            Transition::Buffered => {
                self.buffer.push(byte);
                Vec::new()
            }
            Transition::Completed => {
                self.buffer.push(byte);
                let events = self.complete_frame();
                self.buffer.clear();
                events
            }
        }
    }

    /// Feed a transport chunk and take every batch as soon as it is ready.
    ///
    /// A chunk can close one group and open the next; draining per byte keeps
    /// the first batch from being released by the second group's sync byte.
    pub fn feed_chunk(&mut self, chunk: &[u8]) -> Vec<Vec<Hold>> {
        let mut batches = Vec::new();
        for &byte in chunk {
            self.feed(byte);
            if self.batch_ready {
                batches.push(self.take_holds());
            }
        }
        batches
    }

    pub fn is_batch_ready(&self) -> bool {
        self.batch_ready
    }

    /// Take the ready batch. Returns an empty list when no batch is ready,
    /// leaving any group in progress untouched.
    pub fn take_holds(&mut self) -> Vec<Hold> {
        self.release_batch()
    }

    /// Holds accumulated so far for the current group or ready batch.
    pub fn pending_holds(&self) -> &[Hold] {
        &self.holds
    }

    pub fn is_idle(&self) -> bool {
        self.state == FrameState::Idle
    }

    /// Bytes of the frame in progress.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Announced length of the frame in progress, once its length byte arrived.
    pub fn expected_len(&self) -> Option<usize> {
        self.state.expected_len()
    }

    /// Abandon everything, e.g. after the transport reports a disconnect.
    pub fn reset(&mut self) {
        self.state = FrameState::Idle;
        self.buffer.clear();
        self.holds.clear();
        self.batch_ready = false;
    }

    fn release_batch(&mut self) -> Vec<Hold> {
        if !self.batch_ready {
            return Vec::new();
        }
        self.batch_ready = false;
        std::mem::take(&mut self.holds)
    }

    fn complete_frame(&mut self) -> Vec<DecodeEvent> {
        let frame = match parse_frame(&self.buffer) {
            Ok(frame) => frame,
            Err(err) => return vec![self.reject(err)],
        };

        let pending = self.holds.len();
        if (pending == 0) != frame.role.is_first() {
            return vec![self.reject(FrameError::OrderingViolation {
                role: frame.role,
                pending,
            })];
        }

        let mut events = Vec::with_capacity(frame.holds.len() + 2);
        events.extend(frame.holds.iter().copied().map(DecodeEvent::HoldAppended));
        events.push(DecodeEvent::FrameAccepted(frame.role));
        self.holds.extend(frame.holds);

        if frame.role.is_last() {
            self.batch_ready = true;
            debug!(holds = self.holds.len(), "batch ready");
            events.push(DecodeEvent::BatchReady {
                holds: self.holds.len(),
            });
        }
        events
    }

    fn reject(&mut self, err: FrameError) -> DecodeEvent {
        warn!(kind = err.kind(), dropped = self.holds.len(), "frame rejected: {err}");
        self.holds.clear();
        self.batch_ready = false;
        DecodeEvent::FrameRejected(err)
    }
}
