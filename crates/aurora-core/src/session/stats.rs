use crate::decoder::DecodeEvent;
use crate::protocol::error::FrameError;
use crate::DecodeSummary;

impl DecodeSummary {
    pub(crate) fn record(&mut self, event: &DecodeEvent) {
        match event {
            DecodeEvent::HoldAppended(_) => self.holds_decoded += 1,
            DecodeEvent::FrameAccepted(_) => self.frames_accepted += 1,
            DecodeEvent::BatchReady { .. } => self.batches_ready += 1,
            DecodeEvent::FrameRejected(err) => {
                self.frames_rejected += 1;
                match err {
                    FrameError::ChecksumMismatch { .. } => self.checksum_failures += 1,
                    FrameError::OrderingViolation { .. } => self.ordering_violations += 1,
                    _ => {}
                }
            }
        }
    }
}
