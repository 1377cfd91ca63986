//! SSE frame parsing for streamed chat completions.
//!
//! The Mistral streaming endpoint emits `data: <json>` frames separated
//! by blank lines, with a final `data: [DONE]` sentinel. [`parse_frame`]
//! turns one frame into a [`Frame`]; malformed JSON yields `None` and
//! the frame is dropped without aborting the stream.
//!
//! Tool calls arrive split across chunks: the first fragment for an
//! index carries the id and name, later fragments append argument text.
//! [`ToolCallAccumulator`] reassembles them.

use std::collections::HashMap;

use mistral_kit::ToolCallRequest;
use mistral_kit::chat::FunctionCall;

use crate::types::{StreamChunk, ToolCallDelta};

/// Incremental UTF-8 decoder for a byte stream.
///
/// Network reads split at arbitrary byte offsets, so a multibyte
/// character can straddle two chunks; decoding each chunk on its own
/// would mangle it into replacement characters. Incomplete trailing
/// sequences are held back until a later chunk completes them.
#[derive(Debug, Default)]
pub(crate) struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends the decoded text of `bytes` to `out`.
    ///
    /// Permanently invalid byte sequences are skipped without inserting
    /// replacement characters.
    pub(crate) fn decode(&mut self, bytes: &[u8], out: &mut String) {
        self.pending.extend_from_slice(bytes);
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    if valid_up_to > 0 {
                        // SAFETY: `from_utf8` validated bytes up to
                        // this index.
                        let valid = unsafe {
                            std::str::from_utf8_unchecked(&self.pending[..valid_up_to])
                        };
                        out.push_str(valid);
                    }
                    match e.error_len() {
                        Some(invalid) => {
                            self.pending.drain(..valid_up_to + invalid);
                        }
                        // Incomplete sequence at the end of the chunk;
                        // keep it for the next one.
                        None => {
                            self.pending.drain(..valid_up_to);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Number of bytes held back awaiting completion.
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// One decoded SSE frame.
#[derive(Debug)]
pub(crate) enum Frame {
    /// The `[DONE]` sentinel.
    Done,
    /// A parsed completion chunk.
    Chunk(StreamChunk),
}

/// Extracts the payload of the first `data:` line in an SSE event.
fn extract_data_line(event_text: &str) -> Option<&str> {
    event_text
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
}

/// Parses one SSE event into a [`Frame`].
///
/// Returns `None` for events without a `data:` line and for payloads
/// that are not valid JSON.
pub(crate) fn parse_frame(event_text: &str) -> Option<Frame> {
    let data = extract_data_line(event_text)?;
    if data == "[DONE]" {
        return Some(Frame::Done);
    }
    serde_json::from_str::<StreamChunk>(data).ok().map(Frame::Chunk)
}

/// State tracked per in-flight tool call during streaming.
#[derive(Debug)]
struct ToolCallState {
    id: Option<String>,
    name: String,
    arguments_buffer: String,
}

/// Reassembles tool calls from per-index fragments.
#[derive(Debug, Default)]
pub(crate) struct ToolCallAccumulator {
    states: HashMap<u32, ToolCallState>,
}

impl ToolCallAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Absorbs one batch of tool-call fragments.
    pub(crate) fn absorb(&mut self, deltas: &[ToolCallDelta]) {
        for delta in deltas {
            let state = self.states.entry(delta.index).or_insert(ToolCallState {
                id: None,
                name: String::new(),
                arguments_buffer: String::new(),
            });
            if let Some(id) = &delta.id {
                state.id = Some(id.clone());
            }
            if let Some(function) = &delta.function {
                if let Some(name) = &function.name {
                    state.name = name.clone();
                }
                if let Some(arguments) = &function.arguments {
                    state.arguments_buffer.push_str(arguments);
                }
            }
        }
    }

    /// Returns the completed calls in index order.
    ///
    /// A call that never received argument text gets `"{}"`, matching
    /// what the non-streaming endpoint returns for no-arg calls.
    pub(crate) fn finish(self) -> Vec<ToolCallRequest> {
        let mut entries: Vec<(u32, ToolCallState)> = self.states.into_iter().collect();
        entries.sort_unstable_by_key(|(index, _)| *index);
        entries
            .into_iter()
            .filter(|(_, state)| !state.name.is_empty())
            .map(|(_, state)| ToolCallRequest {
                id: state.id,
                call_type: Some("function".into()),
                function: FunctionCall {
                    name: state.name,
                    arguments: if state.arguments_buffer.is_empty() {
                        "{}".into()
                    } else {
                        state.arguments_buffer
                    },
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionDelta;

    fn delta(index: u32, id: Option<&str>, name: Option<&str>, args: Option<&str>) -> ToolCallDelta {
        ToolCallDelta {
            index,
            id: id.map(String::from),
            function: Some(FunctionDelta {
                name: name.map(String::from),
                arguments: args.map(String::from),
            }),
        }
    }

    #[test]
    fn test_extract_data_line() {
        assert_eq!(
            extract_data_line("event: message\ndata: {\"a\":1}\n\n"),
            Some("{\"a\":1}")
        );
        assert_eq!(extract_data_line(": keep-alive\n\n"), None);
    }

    #[test]
    fn test_parse_done_sentinel() {
        assert!(matches!(parse_frame("data: [DONE]\n\n"), Some(Frame::Done)));
    }

    #[test]
    fn test_parse_content_chunk() {
        let frame = parse_frame("data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n\n");
        let Some(Frame::Chunk(chunk)) = frame else {
            panic!("expected chunk");
        };
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hi"));
    }

    #[test]
    fn test_malformed_json_is_dropped() {
        assert!(parse_frame("data: {not json}\n\n").is_none());
        assert!(parse_frame("\n\n").is_none());
    }

    #[test]
    fn test_accumulator_reassembles_fragmented_arguments() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[delta(0, Some("call_1"), Some("calculator"), Some(""))]);
        acc.absorb(&[delta(0, None, None, Some("{\"operation\":"))]);
        acc.absorb(&[delta(0, None, None, Some("\"add\",\"a\":1,\"b\":2}"))]);

        let calls = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id.as_deref(), Some("call_1"));
        assert_eq!(calls[0].function.name, "calculator");
        assert_eq!(
            calls[0].function.arguments,
            "{\"operation\":\"add\",\"a\":1,\"b\":2}"
        );
    }

    #[test]
    fn test_accumulator_orders_by_index() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[
            delta(1, Some("call_b"), Some("second"), None),
            delta(0, Some("call_a"), Some("first"), None),
        ]);
        let calls = acc.finish();
        assert_eq!(calls[0].function.name, "first");
        assert_eq!(calls[1].function.name, "second");
    }

    #[test]
    fn test_accumulator_empty_arguments_become_empty_object() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[delta(0, Some("call_1"), Some("get_date"), None)]);
        let calls = acc.finish();
        assert_eq!(calls[0].function.arguments, "{}");
    }

    #[test]
    fn test_accumulator_drops_nameless_fragments() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[delta(0, None, None, Some("{\"x\":1}"))]);
        assert!(acc.finish().is_empty());
    }

    #[test]
    fn test_utf8_carry_passes_complete_chunks_through() {
        let mut carry = Utf8Carry::new();
        let mut out = String::new();
        carry.decode(b"hello", &mut out);
        assert_eq!(out, "hello");
        assert_eq!(carry.pending_len(), 0);
    }

    #[test]
    fn test_utf8_carry_joins_two_byte_char_split_across_chunks() {
        // "café": the 'e' with acute is 0xC3 0xA9.
        let bytes = "café".as_bytes();
        let mut carry = Utf8Carry::new();
        let mut out = String::new();

        carry.decode(&bytes[..4], &mut out);
        assert_eq!(out, "caf");
        assert_eq!(carry.pending_len(), 1);

        carry.decode(&bytes[4..], &mut out);
        assert_eq!(out, "café");
        assert_eq!(carry.pending_len(), 0);
    }

    #[test]
    fn test_utf8_carry_four_byte_char_one_byte_at_a_time() {
        let bytes = "🦀".as_bytes();
        let mut carry = Utf8Carry::new();
        let mut out = String::new();
        for byte in bytes {
            carry.decode(std::slice::from_ref(byte), &mut out);
        }
        assert_eq!(out, "🦀");
        assert_eq!(carry.pending_len(), 0);
    }

    #[test]
    fn test_utf8_carry_skips_invalid_bytes() {
        let mut carry = Utf8Carry::new();
        let mut out = String::new();
        carry.decode(&[b'a', 0xFF, b'b'], &mut out);
        assert_eq!(out, "ab");
        assert_eq!(carry.pending_len(), 0);
    }
}
