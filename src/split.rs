//! Newline-preferring content splitting.
//!
//! Webhook endpoints cap the length of a message body. Content longer than
//! the cap is cut into consecutive chunks, each at most `limit` scalar values
//! long.
//!
//! ## How It Works
//!
//! ```text
//! limit = 11
//!
//! Content: "line1\nline2\nline3"
//!
//! Window:  "line1\nline2"        <- first 11 scalars
//!                ^ last newline in the window
//!
//! Chunk 0: "line1"               [0..5]   newline at 5 is consumed
//! Chunk 1: "line2\nline3"        [6..17]  remainder fits, emitted as-is
//! ```
//!
//! When the window holds no newline the cut is hard, at exactly `limit`
//! scalars, and nothing is consumed:
//!
//! ```text
//! limit = 5, content = "aaaaaaaaaaaa"
//!
//! ["aaaaa", "aaaaa", "aa"]
//! ```
//!
//! ## Scalars, Not Bytes
//!
//! Limits count Unicode scalar values (`char`s). A window never ends inside
//! a multi-byte character, so every chunk is valid UTF-8 on its own.
//!
//! With [`HardCut::Grapheme`], hard cuts additionally back off to the last
//! extended grapheme cluster boundary, so a flag emoji or an accented letter
//! written with a combining mark stays whole. Newline cuts are unaffected.

use unicode_segmentation::UnicodeSegmentation;

use crate::{Chunk, Cut};

/// Where a hard cut may land.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HardCut {
    /// Exactly at the scalar limit.
    #[default]
    Scalar,
    /// At the last grapheme boundary within the limit.
    Grapheme,
}

/// Splits content into chunks of at most `limit` scalar values, preferring
/// to cut at the last newline of each window.
///
/// ## Example
///
/// ```rust
/// use courier::ContentSplitter;
///
/// let splitter = ContentSplitter::new(2000);
/// let chunks = splitter.split("  short message\n");
///
/// // Input is trimmed; anything under the limit is a single chunk.
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].text, "short message");
/// ```
#[derive(Debug, Clone)]
pub struct ContentSplitter {
    limit: usize,
    hard_cut: HardCut,
}

impl ContentSplitter {
    /// Create a new splitter.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum chunk length in Unicode scalar values
    ///
    /// # Panics
    ///
    /// Panics if `limit == 0`.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "limit must be > 0");
        Self {
            limit,
            hard_cut: HardCut::Scalar,
        }
    }

    /// Choose where hard cuts land.
    #[must_use]
    pub fn with_hard_cut(mut self, hard_cut: HardCut) -> Self {
        self.hard_cut = hard_cut;
        self
    }

    /// The configured limit in scalar values.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Split `content` after trimming surrounding whitespace.
    ///
    /// Always returns at least one chunk. Empty (or all-whitespace) input
    /// yields a single empty chunk.
    #[must_use]
    pub fn split(&self, content: &str) -> Vec<Chunk> {
        let text = content.trim();
        let mut chunks = Vec::with_capacity(self.estimate_chunks(text.len()));
        let mut start = 0;

        loop {
            let rest = &text[start..];

            // Byte offset just past the first `limit` scalars, or None if
            // the remainder already fits.
            let Some((window_end, _)) = rest.char_indices().nth(self.limit) else {
                let index = chunks.len();
                chunks.push(Chunk::new(rest, start, text.len(), index, Cut::End));
                break;
            };

            let window = &rest[..window_end];
            let (end, next, cut) = match window.rfind('\n') {
                Some(newline) => (newline, newline + 1, Cut::Newline),
                None => {
                    let end = self.hard_cut_at(rest, window_end);
                    (end, end, Cut::Hard)
                }
            };

            let index = chunks.len();
            chunks.push(Chunk::new(&rest[..end], start, start + end, index, cut));
            start += next;
        }

        chunks
    }

    /// Rough chunk count for a text of `text_len` bytes. Used for
    /// pre-allocation only.
    #[must_use]
    pub fn estimate_chunks(&self, text_len: usize) -> usize {
        text_len.div_ceil(self.limit).max(1)
    }

    /// Byte offset of a hard cut in `rest`, given that the first `limit`
    /// scalars end at `window_end`.
    fn hard_cut_at(&self, rest: &str, window_end: usize) -> usize {
        match self.hard_cut {
            HardCut::Scalar => window_end,
            HardCut::Grapheme => {
                let boundary = rest
                    .grapheme_indices(true)
                    .map(|(i, _)| i)
                    .take_while(|&i| i <= window_end)
                    .last()
                    .unwrap_or(0);
                // A single cluster longer than the limit cannot be kept whole.
                if boundary == 0 {
                    window_end
                } else {
                    boundary
                }
            }
        }
    }
}

/// Split `content` into plain strings of at most `limit` scalar values.
///
/// Shorthand for [`ContentSplitter::split`] when positions are not needed.
///
/// ```rust
/// assert_eq!(
///     courier::split_content("aaaaaaaaaaaa", 5),
///     vec!["aaaaa", "aaaaa", "aa"],
/// );
/// ```
///
/// # Panics
///
/// Panics if `limit == 0`.
#[must_use]
pub fn split_content(content: &str, limit: usize) -> Vec<String> {
    ContentSplitter::new(limit)
        .split(content)
        .into_iter()
        .map(Chunk::into_text)
        .collect()
}
