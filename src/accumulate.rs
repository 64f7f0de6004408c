//! Folding a chunk stream into a finished reply.

use std::time::Duration;

use futures::{Stream, StreamExt};

use crate::observability::STREAM_MALFORMED_LINES;
use crate::types::StreamChunk;
use crate::{Error, Result};

/// Concatenates chunk contents until the first chunk with `done == true`.
///
/// Nothing past the `done` chunk is pulled from `chunks`, even if the
/// underlying connection has more to give.  A stream that ends without a
/// `done` chunk yields what was received so far.
///
/// Malformed records are skipped with a warning.  Any other error ends the
/// reply and is returned.  When `read_timeout` is set, waiting longer than
/// that for the next record fails with [`Error::Timeout`].
pub async fn accumulate_reply<S>(chunks: S, read_timeout: Option<Duration>) -> Result<String>
where
    S: Stream<Item = Result<StreamChunk>>,
{
    futures::pin_mut!(chunks);
    let mut reply = String::new();
    loop {
        let next = match read_timeout {
            Some(limit) => tokio::time::timeout(limit, chunks.next())
                .await
                .map_err(|_| {
                    Error::timeout(
                        "server stopped sending data",
                        Some(limit.as_secs_f64()),
                    )
                })?,
            None => chunks.next().await,
        };
        match next {
            Some(Ok(chunk)) => {
                reply.push_str(chunk.content());
                if chunk.done {
                    break;
                }
            }
            Some(Err(err)) if err.is_malformed_record() => {
                STREAM_MALFORMED_LINES.click();
                tracing::warn!(error = %err, "skipping malformed stream record");
            }
            Some(Err(err)) => return Err(err),
            None => {
                tracing::debug!("stream ended without a done record");
                break;
            }
        }
    }
    Ok(reply)
}
