//! Sequential transmission of chunks and batches.
//!
//! ## The Loop
//!
//! ```text
//! Idle -> Sending(0) -> Sending(1) -> ... -> Sending(n-1) -> Done
//!              \            \                    \
//!               +------------+--------------------+--> Aborted
//! ```
//!
//! Each unit (text chunk or file batch) is turned into a payload, posted,
//! and its full response body written to the output before the next unit
//! is looked at. A file batch's files are opened only when that batch is
//! reached, and closed again before its request is sent.
//!
//! The first failure of any kind ends the run. The error names the unit
//! that failed; nothing after it is opened or sent, and there are no
//! retries.

use std::io::Write;

use crate::error::Unit;
use crate::{
    ContentSplitter, Error, FileBatcher, FileSource, HardCut, Limits, Payload, Result, Transport,
};

/// What a completed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Requests sent.
    pub requests: usize,
    /// Response bytes written to the output.
    pub bytes: usize,
    /// Responses with a non-2xx status. Their bodies are still written.
    pub rejected: usize,
}

/// Splits or batches input and sends it through a [`Transport`].
///
/// ## Example
///
/// ```rust
/// use courier::{Limits, MockTransport, Transmitter};
///
/// let mock = MockTransport::new();
/// mock.push_response(200, "a");
/// mock.push_response(200, "b");
///
/// let limits = Limits::new(5, 10).unwrap();
/// let transmitter = Transmitter::new(mock.clone(), limits);
///
/// let mut out = Vec::new();
/// let summary = transmitter.send_text("hello world", &mut out).unwrap();
///
/// assert_eq!(summary.requests, 3); // "hello", " worl", "d"
/// assert_eq!(out, b"ab");          // third response was empty
/// ```
#[derive(Debug, Clone)]
pub struct Transmitter<T> {
    transport: T,
    splitter: ContentSplitter,
    batcher: FileBatcher,
}

impl<T: Transport> Transmitter<T> {
    /// Create a transmitter sending through `transport` within `limits`.
    #[must_use]
    pub fn new(transport: T, limits: Limits) -> Self {
        Self {
            transport,
            splitter: ContentSplitter::new(limits.max_content_len()),
            batcher: FileBatcher::new(limits.max_files()),
        }
    }

    /// Choose where hard cuts land when splitting text.
    #[must_use]
    pub fn with_hard_cut(mut self, hard_cut: HardCut) -> Self {
        self.splitter = self.splitter.with_hard_cut(hard_cut);
        self
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Text mode: split `content` and post each chunk as a JSON message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] wrapping the first failure.
    pub fn send_text<W: Write>(&self, content: &str, out: &mut W) -> Result<Summary> {
        let chunks = self.splitter.split(content);
        tracing::info!(chunks = chunks.len(), limit = self.splitter.limit(), "sending text");

        self.drive(Unit::Chunk, &chunks, out, |chunk| Payload::text(&chunk.text))
    }

    /// File mode: batch `sources` and post each batch as a multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] wrapping the first failure.
    pub fn send_files<I, W>(&self, sources: I, out: &mut W) -> Result<Summary>
    where
        I: IntoIterator,
        I::Item: FileSource,
        W: Write,
    {
        let batches = self.batcher.batch(sources);
        tracing::info!(batches = batches.len(), size = self.batcher.size(), "sending files");

        self.drive(Unit::Batch, &batches, out, Payload::files)
    }

    fn drive<I, W, F>(&self, unit: Unit, items: &[I], out: &mut W, build: F) -> Result<Summary>
    where
        W: Write,
        F: Fn(&I) -> Result<Payload>,
    {
        let total = items.len();
        let mut summary = Summary::default();

        for (index, item) in items.iter().enumerate() {
            let span = tracing::debug_span!("send", %unit, index, total);
            let _guard = span.enter();

            let abort = |source: Error| {
                tracing::error!(error = %source, "aborting run");
                Error::Aborted {
                    unit,
                    index,
                    total,
                    source: Box::new(source),
                }
            };

            let payload = build(item).map_err(abort)?;
            let response = self.transport.post(payload).map_err(abort)?;

            out.write_all(&response.body)
                .and_then(|()| out.flush())
                .map_err(|e| abort(Error::Output(e)))?;

            summary.requests += 1;
            summary.bytes += response.body.len();
            if !response.is_success() {
                summary.rejected += 1;
            }
        }

        tracing::debug!(?summary, "run complete");
        Ok(summary)
    }
}
