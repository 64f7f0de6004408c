use biometrics::{Collector, Counter, Moments};

pub(crate) static CHAT_REQUESTS: Counter = Counter::new("gemma_chat.client.requests");
pub(crate) static CHAT_REQUEST_ERRORS: Counter = Counter::new("gemma_chat.client.request_errors");
pub(crate) static CHAT_REQUEST_DURATION: Moments =
    Moments::new("gemma_chat.client.request_duration_seconds");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("gemma_chat.stream.chunks");
pub(crate) static STREAM_MALFORMED_LINES: Counter =
    Counter::new("gemma_chat.stream.malformed_lines");
pub(crate) static STREAM_BYTES: Counter = Counter::new("gemma_chat.stream.bytes");

pub(crate) static TRANSCRIPT_EVICTIONS: Counter =
    Counter::new("gemma_chat.transcript.evictions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CHAT_REQUESTS);
    collector.register_counter(&CHAT_REQUEST_ERRORS);
    collector.register_moments(&CHAT_REQUEST_DURATION);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_MALFORMED_LINES);
    collector.register_counter(&STREAM_BYTES);

    collector.register_counter(&TRANSCRIPT_EVICTIONS);
}
