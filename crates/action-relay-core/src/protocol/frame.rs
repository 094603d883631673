//! Newline-delimited framing.
//!
//! TCP may split one message across reads or deliver several in one read,
//! so frames are cut on `\n` from a buffered reader rather than per read.

use crate::{CoreResult, RelayError};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum accepted line length (1MB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Read the next non-blank line. `Ok(None)` means the peer closed the stream.
///
/// A final line without a trailing newline is still returned. A line longer
/// than [`MAX_FRAME_SIZE`] is an error; the stream cannot be resynchronised
/// after it.
pub async fn read_frame<R: AsyncBufRead + Unpin>(reader: &mut R) -> CoreResult<Option<String>> {
    let mut buf = Vec::new();

    loop {
        buf.clear();

        let read = (&mut *reader)
            .take(MAX_FRAME_SIZE as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;

        if read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        } else if buf.len() > MAX_FRAME_SIZE {
            return Err(RelayError::FrameTooLarge {
                limit: MAX_FRAME_SIZE,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let line = String::from_utf8_lossy(&buf);
        if !line.trim().is_empty() {
            return Ok(Some(line.into_owned()));
        }
    }
}

/// Write one line and flush it.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> CoreResult<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
