//! Text chunking for embedding pipelines.
//!
//! Both chunkers normalize Windows line endings to `\n` before
//! splitting and cut windows by character count, never inside a UTF-8
//! code point.

/// Default window size for [`chunk_text`].
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Default window size for [`chunk_text_with_overlap`].
pub const DEFAULT_OVERLAP_CHUNK_SIZE: usize = 800;

/// Default overlap for [`chunk_text_with_overlap`].
pub const DEFAULT_CHUNK_OVERLAP: usize = 120;

/// Splits `input` into consecutive windows of at most `max` characters.
///
/// Empty input yields no chunks. The final chunk may be shorter than
/// `max`.
pub fn chunk_text(input: &str, max: usize) -> Vec<String> {
    if input.is_empty() || max == 0 {
        return Vec::new();
    }

    let normalized = input.replace("\r\n", "\n");
    let chars: Vec<char> = normalized.chars().collect();
    chars
        .chunks(max)
        .map(|window| window.iter().collect())
        .collect()
}

/// Splits `input` into overlapping windows.
///
/// Each window holds at most `size` characters and successive windows
/// share `overlap` characters, so the stride is `size - overlap`. An
/// `overlap >= size` is clamped to a stride of one character.
pub fn chunk_text_with_overlap(input: &str, size: usize, overlap: usize) -> Vec<String> {
    if input.is_empty() || size == 0 {
        return Vec::new();
    }

    let normalized = input.replace("\r\n", "\n");
    let chars: Vec<char> = normalized.chars().collect();
    let stride = size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_text("", DEFAULT_CHUNK_SIZE).is_empty());
        assert!(chunk_text_with_overlap("", 800, 120).is_empty());
    }

    #[test]
    fn test_short_input_is_one_chunk() {
        let chunks = chunk_text("hello world", DEFAULT_CHUNK_SIZE);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_exact_boundary() {
        let input = "abcdef";
        let chunks = chunk_text(input, 3);
        assert_eq!(chunks, vec!["abc", "def"]);
    }

    #[test]
    fn test_trailing_partial_chunk() {
        let chunks = chunk_text("abcdefg", 3);
        assert_eq!(chunks, vec!["abc", "def", "g"]);
    }

    #[test]
    fn test_crlf_normalized() {
        let chunks = chunk_text("a\r\nb", 10);
        assert_eq!(chunks, vec!["a\nb"]);
    }

    #[test]
    fn test_multibyte_boundary_safe() {
        // Each snowman is one char but three bytes.
        let input = "\u{2603}".repeat(5);
        let chunks = chunk_text(&input, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 2);
        assert_eq!(chunks[2].chars().count(), 1);
    }

    #[test]
    fn test_overlap_stride() {
        let input = "abcdefghij";
        let chunks = chunk_text_with_overlap(input, 4, 2);
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij"]);
    }

    #[test]
    fn test_overlap_reconstructs_full_text() {
        let input: String = ('a'..='z').collect();
        let chunks = chunk_text_with_overlap(&input, 800, 120);
        assert_eq!(chunks, vec![input]);
    }

    #[test]
    fn test_overlap_larger_than_size_still_advances() {
        let chunks = chunk_text_with_overlap("abcd", 2, 5);
        assert_eq!(chunks, vec!["ab", "bc", "cd"]);
    }
}
