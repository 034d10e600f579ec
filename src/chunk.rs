//! The Chunk type: one message-sized piece of text with position metadata.

/// How a chunk ended.
///
/// The cut kind is what makes the split reversible: a newline cut consumed
/// exactly one `'\n'` that belongs between this chunk and the next, a hard
/// cut consumed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cut {
    /// Split at a newline; the newline itself is dropped.
    Newline,
    /// Split at the length limit with no newline in reach.
    Hard,
    /// Final remainder of the content.
    End,
}

/// A chunk of text with its position in the (trimmed) original content.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the trimmed content, matching
/// Rust's string slicing. Length limits are measured in scalar values, see
/// [`Chunk::char_len`].
///
/// ```rust
/// use courier::{ContentSplitter, Cut};
///
/// let content = "line1\nline2\nline3";
/// let chunks = ContentSplitter::new(11).split(content);
///
/// assert_eq!(&content[chunks[0].start..chunks[0].end], "line1");
/// assert_eq!(chunks[0].cut, Cut::Newline);
/// assert_eq!(chunks[1].start, 6); // the newline at 5 was consumed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Byte offset where this chunk starts in the trimmed content.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive) in the trimmed content.
    pub end: usize,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
    /// How the chunk was terminated.
    pub cut: Cut,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize, cut: Cut) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
            cut,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The length of this chunk in Unicode scalar values.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The byte span of this chunk in the trimmed content.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Consume the chunk, keeping only its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, span: {}..{}, chars: {}, cut: {:?} }}",
            self.index,
            self.start,
            self.end,
            self.char_len(),
            self.cut
        )
    }
}

/// Rebuild the trimmed content from its chunks.
///
/// Newlines consumed by [`Cut::Newline`] boundaries are put back; hard cuts
/// are joined directly.
///
/// ```rust
/// use courier::{reassemble, ContentSplitter};
///
/// let text = "alpha\nbeta gamma delta";
/// let chunks = ContentSplitter::new(8).split(text);
/// assert_eq!(reassemble(&chunks), text);
/// ```
#[must_use]
pub fn reassemble(chunks: &[Chunk]) -> String {
    let mut out = String::with_capacity(chunks.iter().map(|c| c.len() + 1).sum());
    for chunk in chunks {
        out.push_str(&chunk.text);
        if chunk.cut == Cut::Newline {
            out.push('\n');
        }
    }
    out
}
