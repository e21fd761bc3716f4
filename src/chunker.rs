//! Splitting long documents into overlapping, size-bounded chunks.
//!
//! Sizes are measured in characters. Each chunk is at most `max_size`
//! characters long and shares exactly `overlap` characters with the next
//! one, so concatenating the chunks with the overlaps removed gives back the
//! original text. Split points are searched from the end of the window
//! backwards, preferring a paragraph break, then a line break, then a
//! sentence end, then any space; if none is found the window is cut hard.

use tracing::debug;

/// Break candidates, strongest first. A chunk ends right after the separator.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", " "];

#[derive(Debug, Clone, Copy)]
pub struct DocumentChunker {
    max_size: usize,
    overlap: usize,
}

impl DocumentChunker {
    /// `overlap` is clamped below `max_size` so that splitting always advances.
    pub fn new(max_size: usize, overlap: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            max_size,
            overlap: overlap.min(max_size - 1),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Whether `text` has to be split before it can be summarized in one call.
    pub fn needs_split(&self, text: &str) -> bool {
        text.chars().nth(self.max_size).is_some()
    }

    /// Split `text` into chunks. Text that already fits yields one chunk;
    /// empty text yields none.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if !self.needs_split(text) {
            return vec![text.to_string()];
        }

        let chars: Vec<char> = text.chars().collect();
        // Never end a chunk so early that the next one would not move forward,
        // and avoid slivers when the only break sits near the window start.
        let min_len = (self.overlap + 1).max(self.max_size / 2);

        let mut chunks: Vec<String> = Vec::new();
        let mut start = 0;
        loop {
            if chars.len() - start <= self.max_size {
                chunks.push(chars[start..].iter().collect());
                break;
            }
            let hard_end = start + self.max_size;
            let end = find_break(&chars, start + min_len, hard_end).unwrap_or(hard_end);
            chunks.push(chars[start..end].iter().collect());
            start = end - self.overlap;
        }

        debug!(
            chars = chars.len(),
            chunks = chunks.len(),
            max_size = self.max_size,
            overlap = self.overlap,
            "Split document"
        );
        chunks
    }
}

/// Latest position in `lo..=hi` that directly follows a separator, trying
/// separators in priority order.
fn find_break(chars: &[char], lo: usize, hi: usize) -> Option<usize> {
    SEPARATORS.iter().find_map(|sep| {
        let sep: Vec<char> = sep.chars().collect();
        (lo.max(sep.len())..=hi)
            .rev()
            .find(|&p| chars[p - sep.len()..p] == sep[..])
    })
}
