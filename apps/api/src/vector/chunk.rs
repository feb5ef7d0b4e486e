//! Fixed-window document chunking.
//!
//! Window and overlap are measured in characters, not bytes, so multibyte
//! text never splits inside a code point. The scan stops as soon as a chunk
//! reaches the end of the text — the tail is carried by the final window's
//! overlap rather than emitted as an extra fully-overlapped chunk.

/// Characters per chunk.
pub const CHUNK_SIZE: usize = 1000;
/// Characters shared between consecutive chunks. Must stay below CHUNK_SIZE.
pub const CHUNK_OVERLAP: usize = 200;

const STRIDE: usize = CHUNK_SIZE - CHUNK_OVERLAP;

/// Splits `text` into overlapping windows. Empty input yields no chunks.
pub fn chunk_text(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the text, so
    // windows can be sliced without re-walking the string per chunk.
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let char_len = boundaries.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + CHUNK_SIZE).min(char_len);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        if end == char_len {
            break;
        }
        start += STRIDE;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inverse of `chunk_text`: drops each non-first chunk's leading overlap
    /// and concatenates.
    fn reassemble(chunks: &[String]) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(chunk);
            } else {
                out.extend(chunk.chars().skip(CHUNK_OVERLAP));
            }
        }
        out
    }

    fn text_of_len(n: usize) -> String {
        // Cycle through a small alphabet so overlaps are position-sensitive.
        (0..n)
            .map(|i| char::from(b'a' + (i % 23) as u8))
            .collect()
    }

    fn expected_count(len: usize) -> usize {
        if len == 0 {
            0
        } else if len <= CHUNK_SIZE {
            1
        } else {
            (len - CHUNK_OVERLAP).div_ceil(STRIDE)
        }
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_text("").is_empty());
    }

    #[test]
    fn test_short_input_is_single_chunk() {
        let chunks = chunk_text("short resume text");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "short resume text");
    }

    #[test]
    fn test_exactly_window_size_is_single_chunk() {
        let text = text_of_len(CHUNK_SIZE);
        assert_eq!(chunk_text(&text).len(), 1);
    }

    #[test]
    fn test_chunk_count_matches_formula() {
        for len in [1, 999, 1000, 1001, 1600, 1800, 1801, 2600, 2601, 5000, 12345] {
            let text = text_of_len(len);
            let chunks = chunk_text(&text);
            assert_eq!(
                chunks.len(),
                expected_count(len),
                "wrong chunk count for len={len}"
            );
        }
    }

    #[test]
    fn test_every_chunk_within_window_size() {
        let text = text_of_len(4321);
        for chunk in chunk_text(&text) {
            assert!(chunk.chars().count() <= CHUNK_SIZE);
        }
    }

    #[test]
    fn test_consecutive_chunks_share_overlap() {
        let text = text_of_len(3000);
        let chunks = chunk_text(&text);
        for pair in chunks.windows(2) {
            let tail: String = pair[0]
                .chars()
                .skip(pair[0].chars().count() - CHUNK_OVERLAP)
                .collect();
            let head: String = pair[1].chars().take(CHUNK_OVERLAP).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_reassemble_reconstructs_original() {
        for len in [1, 500, 1000, 1001, 1800, 2601, 9999] {
            let text = text_of_len(len);
            assert_eq!(reassemble(&chunk_text(&text)), text, "len={len}");
        }
    }

    #[test]
    fn test_multibyte_text_chunks_on_char_boundaries() {
        let text: String = "résumé façade naïveté ".repeat(100);
        let chunks = chunk_text(&text);
        assert!(chunks.len() > 1);
        assert_eq!(reassemble(&chunks), text);
    }
}
