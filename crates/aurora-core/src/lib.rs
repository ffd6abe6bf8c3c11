//! Aurora board emulator core.
//!
//! The board receives climbing-wall "problems" from the phone app as a
//! stream of writes on one characteristic. This crate turns that stream back
//! into holds: transport sources replay the writes, the `decoder` frames and
//! validates them (with the wire details in `protocol`), and the `render`
//! side lights a strip with each completed batch. Replays aggregate into a
//! deterministic, versioned report.
//!
//! Invariants:
//! - The decoder never panics and recovers from any input by resyncing.
//! - Holds of a multi-frame group are only exposed once the group completes.
//! - Report contents depend only on the input bytes, chunking and board config.
//!
//! # Examples
//! ```
//! use aurora_core::{Hold, PacketDecoder, Rgb};
//!
//! let mut decoder = PacketDecoder::new();
//! for byte in [1, 4, 162, 0, 84, 10, 0, 255, 0] {
//!     decoder.feed(byte);
//! }
//! assert!(decoder.is_batch_ready());
//! assert_eq!(decoder.take_holds(), vec![Hold::new(10, Rgb::new(255, 255, 255))]);
//! ```

use serde::{Deserialize, Serialize};

pub mod config;
mod decoder;
mod hold;
pub mod protocol;
pub mod render;
mod session;
mod source;

pub use config::{BoardConfig, ConfigError};
pub use decoder::{DecodeEvent, PacketDecoder};
pub use hold::Hold;
pub use protocol::{FrameError, Rgb, Role};
pub use render::{LedStrip, PixelBuffer, RenderOutcome, render_batch};
pub use session::{ReplayOptions, SessionError, replay_file, replay_source};
pub use source::{ChunkFileSource, ChunkSource, DEFAULT_CHUNK_SIZE, MemorySource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the input has no modification time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Outcome of replaying one capture through the decoder.
///
/// # Examples
/// ```
/// use aurora_core::make_stub_report;
///
/// let report = make_stub_report("capture.bin", 27);
/// assert_eq!(report.report_version, aurora_core::REPORT_VERSION);
/// assert!(report.batches.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp of the input's last modification.
    pub generated_at: String,
    pub input: InputInfo,
    pub board: BoardSummary,
    pub transport: TransportSummary,
    pub decode: DecodeSummary,
    /// Completed batches in arrival order.
    pub batches: Vec<BatchSummary>,
}

impl Report {
    /// True when at least one frame failed validation.
    pub fn has_rejections(&self) -> bool {
        self.decode.frames_rejected > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the replay.
    pub path: String,
    /// Bytes delivered to the decoder.
    pub bytes: u64,
}

/// Board identity the replay ran with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSummary {
    pub display_name: String,
    pub api_level: u8,
    pub led_count: u16,
    pub advertised_name: String,
}

impl From<&BoardConfig> for BoardSummary {
    fn from(board: &BoardConfig) -> Self {
        Self {
            display_name: board.display_name.clone(),
            api_level: board.api_level,
            led_count: board.led_count,
            advertised_name: board.advertised_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportSummary {
    /// Maximum bytes per write.
    pub chunk_size: u64,
    pub chunks_total: u64,
    pub bytes_total: u64,
}

/// Decoder counters.
///
/// # Examples
/// ```
/// use aurora_core::DecodeSummary;
///
/// let summary = DecodeSummary::default();
/// assert_eq!(summary.frames_rejected, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeSummary {
    pub frames_accepted: u64,
    /// All rejected frames, including the two counters below.
    pub frames_rejected: u64,
    pub checksum_failures: u64,
    pub ordering_violations: u64,
    pub holds_decoded: u64,
    pub batches_ready: u64,
    /// Holds of a group still waiting for its last frame at end of input.
    pub pending_holds: u64,
    /// Bytes of a frame still incomplete at end of input.
    pub partial_frame_bytes: u64,
}

/// One completed group and how it landed on the strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub index: u64,
    pub holds: Vec<Hold>,
    pub applied: u64,
    pub out_of_range: u64,
}

/// Build a report with base fields filled and empty aggregates.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "aurora".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        board: BoardSummary::from(&BoardConfig::default()),
        transport: TransportSummary::default(),
        decode: DecodeSummary::default(),
        batches: vec![],
    }
}
