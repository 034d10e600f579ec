//! Fixed-size batching of file references.
//!
//! Endpoints cap the number of attachments per request. Files are grouped
//! into consecutive batches of `size`; the last batch holds the remainder.
//!
//! ```text
//! size = 10
//!
//! Files:   [a b c d e f g h i j k]
//!
//! Batch 0: [a b c d e f g h i j]   file[0]..file[9]
//! Batch 1: [k]                     file[0]  <- field index restarts
//! ```
//!
//! Batching never touches the filesystem. Whether a path exists is found
//! out when its batch is transmitted.

/// One group of at most `size` entries, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    /// Zero-based index of this batch in the sequence.
    pub index: usize,
    /// The entries; position within the batch is the form-field index.
    pub entries: Vec<T>,
}

impl<T> Batch<T> {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no entries. Never true for batches produced
    /// by [`FileBatcher`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries paired with their form-field index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries.iter().enumerate()
    }
}

/// Groups items into consecutive batches of at most `size`.
///
/// ## Example
///
/// ```rust
/// use courier::FileBatcher;
///
/// let batches = FileBatcher::new(2).batch(["a", "b", "c"]);
///
/// assert_eq!(batches.len(), 2);
/// assert_eq!(batches[0].entries, ["a", "b"]);
/// assert_eq!(batches[1].entries, ["c"]);
/// ```
#[derive(Debug, Clone)]
pub struct FileBatcher {
    size: usize,
}

impl FileBatcher {
    /// Create a new batcher.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "batch size must be > 0");
        Self { size }
    }

    /// The maximum batch size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Split `items` into batches. Empty input yields no batches.
    #[must_use]
    pub fn batch<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<Batch<T>> {
        let mut batches = Vec::new();
        let mut current = Vec::with_capacity(self.size);

        for item in items {
            current.push(item);
            if current.len() == self.size {
                let entries = std::mem::replace(&mut current, Vec::with_capacity(self.size));
                batches.push(Batch {
                    index: batches.len(),
                    entries,
                });
            }
        }

        if !current.is_empty() {
            batches.push(Batch {
                index: batches.len(),
                entries: current,
            });
        }

        batches
    }
}

/// Group `paths` into batches of at most `size`, keeping only the entries.
///
/// # Panics
///
/// Panics if `size == 0`.
#[must_use]
pub fn batch_paths(paths: &[String], size: usize) -> Vec<Vec<String>> {
    FileBatcher::new(size)
        .batch(paths.iter().cloned())
        .into_iter()
        .map(|b| b.entries)
        .collect()
}
