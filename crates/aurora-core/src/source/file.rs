use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{ChunkSource, SourceError};

/// Replays a binary capture of characteristic writes, `chunk_size` bytes at a time.
pub struct ChunkFileSource {
    reader: BufReader<File>,
    chunk_size: usize,
}

impl ChunkFileSource {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self, SourceError> {
        if chunk_size == 0 {
            return Err(SourceError::InvalidChunkSize { size: chunk_size });
        }
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            chunk_size,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl ChunkSource for ChunkFileSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut chunk = Vec::with_capacity(self.chunk_size);
        let read = (&mut self.reader)
            .take(self.chunk_size as u64)
            .read_to_end(&mut chunk)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(chunk))
    }
}
