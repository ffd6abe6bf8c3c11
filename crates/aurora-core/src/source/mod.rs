//! Transport stand-ins: where the decoder's bytes come from.
//!
//! On the board, each write to the data-transfer characteristic arrives as
//! one chunk. Sources replay those writes in order so the rest of the crate
//! never touches files directly.

mod file;

pub use file::ChunkFileSource;

use std::collections::VecDeque;

use thiserror::Error;

/// Payload of one write with the default ATT MTU (23 bytes minus 3 bytes of header).
pub const DEFAULT_CHUNK_SIZE: usize = 20;

pub trait ChunkSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid chunk size: {size} (must be at least 1)")]
    InvalidChunkSize { size: usize },
}

/// Chunks held in memory, yielded in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    chunks: VecDeque<Vec<u8>>,
}

impl MemorySource {
    pub fn new<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            chunks: chunks.into_iter().collect(),
        }
    }

    /// Split one contiguous byte stream into writes of `chunk_size` bytes.
    pub fn split(bytes: &[u8], chunk_size: usize) -> Result<Self, SourceError> {
        if chunk_size == 0 {
            return Err(SourceError::InvalidChunkSize { size: chunk_size });
        }
        Ok(Self::new(bytes.chunks(chunk_size).map(<[u8]>::to_vec)))
    }
}

impl ChunkSource for MemorySource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        Ok(self.chunks.pop_front())
    }
}
