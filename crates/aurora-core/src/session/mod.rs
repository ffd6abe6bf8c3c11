use std::path::Path;
use std::time::SystemTime;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::config::{BoardConfig, ConfigError};
use crate::decoder::PacketDecoder;
use crate::render::{PixelBuffer, render_batch};
use crate::source::{ChunkFileSource, ChunkSource, DEFAULT_CHUNK_SIZE, SourceError};
use crate::{
    BatchSummary, BoardSummary, DEFAULT_GENERATED_AT, DecodeSummary, Report, TransportSummary,
    make_stub_report,
};

mod stats;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Invalid board configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Bytes per transport write when replaying a file.
    pub chunk_size: usize,
    pub board: BoardConfig,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            board: BoardConfig::default(),
        }
    }
}

pub fn replay_file(path: &Path, options: &ReplayOptions) -> Result<Report, SessionError> {
    let source = ChunkFileSource::open(path, options.chunk_size)?;
    replay_source(path, source, options)
}

/// Replay every chunk of `source` through a fresh decoder and strip.
///
/// `path` labels the report; its modification time, when readable, becomes
/// the report timestamp.
pub fn replay_source<S: ChunkSource>(
    path: &Path,
    mut source: S,
    options: &ReplayOptions,
) -> Result<Report, SessionError> {
    options.board.validate()?;

    let mut decoder = PacketDecoder::new();
    let mut strip = PixelBuffer::new(options.board.led_count as usize);
    let mut decode = DecodeSummary::default();
    let mut transport = TransportSummary {
        chunk_size: options.chunk_size as u64,
        ..TransportSummary::default()
    };
    let mut batches = Vec::new();

    while let Some(chunk) = source.next_chunk()? {
        transport.chunks_total += 1;
        transport.bytes_total += chunk.len() as u64;
        for &byte in &chunk {
            for event in decoder.step(byte) {
                decode.record(&event);
            }
            if decoder.is_batch_ready() {
                let holds = decoder.take_holds();
                let outcome = render_batch(&mut strip, &holds);
                debug!(
                    index = batches.len(),
                    applied = outcome.applied,
                    out_of_range = outcome.out_of_range,
                    lit = strip.lit(),
                    "batch rendered"
                );
                batches.push(BatchSummary {
                    index: batches.len() as u64,
                    holds,
                    applied: outcome.applied,
                    out_of_range: outcome.out_of_range,
                });
            }
        }
    }
    decode.pending_holds = decoder.pending_holds().len() as u64;
    decode.partial_frame_bytes = decoder.buffered_len() as u64;

    info!(
        chunks = transport.chunks_total,
        bytes = transport.bytes_total,
        batches = batches.len(),
        rejected = decode.frames_rejected,
        "replay finished"
    );

    let mut report = make_stub_report(&path.display().to_string(), transport.bytes_total);
    report.generated_at = path
        .metadata()
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(system_time_to_rfc3339)
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.board = BoardSummary::from(&options.board);
    report.transport = transport;
    report.decode = decode;
    report.batches = batches;
    Ok(report)
}

fn system_time_to_rfc3339(ts: SystemTime) -> Option<String> {
    OffsetDateTime::from(ts).format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ReplayOptions, SessionError, replay_source};
    use crate::protocol::color::Rgb;
    use crate::protocol::encoder::encode_holds;
    use crate::source::MemorySource;
    use crate::{BoardConfig, DEFAULT_GENERATED_AT, Hold};

    fn options(led_count: u16, chunk_size: usize) -> ReplayOptions {
        ReplayOptions {
            chunk_size,
            board: BoardConfig {
                led_count,
                ..BoardConfig::default()
            },
        }
    }

    #[test]
    fn replay_renders_each_batch() {
        let holds = vec![
            Hold::new(3, Rgb::new(255, 0, 0)),
            Hold::new(40, Rgb::new(0, 0, 255)),
        ];
        let bytes: Vec<u8> = encode_holds(&holds).concat();
        let source = MemorySource::split(&bytes, 4).unwrap();

        let report = replay_source(Path::new("memory"), source, &options(10, 4)).unwrap();
        assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);
        assert_eq!(report.transport.chunks_total, 3);
        assert_eq!(report.transport.bytes_total, 12);
        assert_eq!(report.decode.frames_accepted, 1);
        assert_eq!(report.batches.len(), 1);
        assert_eq!(report.batches[0].holds, holds);
        assert_eq!(report.batches[0].applied, 1);
        assert_eq!(report.batches[0].out_of_range, 1);
    }

    #[test]
    fn replay_reports_unfinished_group() {
        let holds: Vec<Hold> = (0..100).map(|i| Hold::new(i, Rgb::new(0, 255, 0))).collect();
        let frames = encode_holds(&holds);
        let mut bytes = frames[0].clone();
        bytes.extend_from_slice(&frames[1][..3]);
        let source = MemorySource::new(vec![bytes]);

        let report = replay_source(Path::new("memory"), source, &ReplayOptions::default()).unwrap();
        assert!(report.batches.is_empty());
        assert_eq!(report.decode.pending_holds, 84);
        assert_eq!(report.decode.partial_frame_bytes, 3);
    }

    #[test]
    fn replay_rejects_invalid_board() {
        let source = MemorySource::new(Vec::new());
        let err = replay_source(Path::new("memory"), source, &options(0, 20)).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }
}
