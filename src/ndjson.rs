//! Newline-delimited JSON processing for streaming chat responses.
//!
//! The chat endpoint answers with one JSON object per line.  This module turns
//! the raw byte stream of an HTTP body into a lazy stream of [`StreamChunk`]
//! records.  Lines may be split across reads in arbitrary places (including in
//! the middle of a multi-byte character), so bytes are buffered and only whole
//! lines are decoded.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability::{STREAM_BYTES, STREAM_CHUNKS};
use crate::types::StreamChunk;
use crate::{Error, Result};

/// Process a stream of bytes into a stream of decoded records.
///
/// Each non-empty line yields exactly one item:
/// - `Ok(chunk)` for a well-formed record,
/// - `Err(Error::Encoding)` / `Err(Error::Serialization)` for a line that is
///   not UTF-8 or not a record, after which decoding continues,
/// - `Err(Error::Streaming)` when the server reports an error in-band.
///
/// Errors from the underlying byte stream are passed through.  A final line
/// without a trailing newline is decoded once the byte stream ends.
pub fn process_ndjson<S>(byte_stream: S) -> impl Stream<Item = Result<StreamChunk>>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    stream::unfold(
        (byte_stream, Vec::<u8>::new(), false),
        |(mut stream, mut buffer, mut exhausted)| async move {
            loop {
                // Drain complete lines before reading more.
                if let Some(line) = take_line(&mut buffer) {
                    match decode_line(&line) {
                        Some(record) => return Some((record, (stream, buffer, exhausted))),
                        None => continue,
                    }
                }

                if exhausted {
                    if buffer.is_empty() {
                        return None;
                    }
                    let line = std::mem::take(&mut buffer);
                    return decode_line(&line).map(|record| (record, (stream, buffer, exhausted)));
                }

                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        buffer.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        return Some((Err(e), (stream, buffer, exhausted)));
                    }
                    None => {
                        exhausted = true;
                    }
                }
            }
        },
    )
}

/// Removes the first complete line from `buffer`, without its terminator.
fn take_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let newline = buffer.iter().position(|b| *b == b'\n')?;
    let mut line: Vec<u8> = buffer.drain(..=newline).collect();
    line.pop();
    Some(line)
}

/// Decodes one line; `None` for blank lines.
fn decode_line(line: &[u8]) -> Option<Result<StreamChunk>> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(e) => {
            return Some(Err(Error::encoding(
                format!("Invalid UTF-8 in stream: {e}"),
                Some(Box::new(e)),
            )));
        }
    };
    if text.is_empty() {
        return None;
    }

    let chunk = match serde_json::from_str::<StreamChunk>(text) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(Error::serialization(
                format!("Failed to parse stream record {}: {e}", preview(text)),
                Some(Box::new(e)),
            )));
        }
    };

    if let Some(message) = &chunk.error {
        return Some(Err(Error::streaming(
            format!("server reported: {message}"),
            None,
        )));
    }

    STREAM_CHUNKS.click();
    Some(Ok(chunk))
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 80;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{:?}...", &text[..idx]),
        None => format!("{text:?}"),
    }
}
