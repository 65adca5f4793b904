// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-size framing of an upload body.

use std::io;

use prost::bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Maximum payload of one chunk message.
pub const CHUNK_SIZE: usize = 4 << 10;

/// Reads a byte source as a sequence of chunks of exactly `chunk_size` bytes,
/// except for the last one which holds the remainder.
///
/// Short reads from the underlying source are coalesced, so an input of `S`
/// bytes always yields `ceil(S / chunk_size)` chunks regardless of how the
/// transport fragments it.
pub struct ChunkReader<R> {
    source: R,
    chunk_size: usize,
    exhausted: bool,
}

impl<R> ChunkReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(source: R, chunk_size: usize) -> Self {
        Self {
            source,
            chunk_size: chunk_size.max(1),
            exhausted: false,
        }
    }

    /// Next non-empty chunk, or `None` at end of input.
    pub async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < self.chunk_size {
            let n = self.source.read(&mut buf[filled..]).await?;
            if n == 0 {
                self.exhausted = true;
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(None);
        }
        buf.truncate(filled);
        Ok(Some(Bytes::from(buf)))
    }
}
