//! # courier
//!
//! Relay text or files to a webhook, one conforming request at a time.
//!
//! ## The Problem
//!
//! Chat webhooks (Discord's in particular) take two kinds of body: a JSON
//! message whose `content` is capped at 2000 characters, and a multipart
//! form carrying at most 10 attachments. Anything larger is rejected, so
//! piping a build log or a directory of screenshots into a webhook fails
//! unless the input is cut to size first.
//!
//! ## Text Mode
//!
//! Text is trimmed and split into chunks of at most `limit` characters
//! (Unicode scalar values, never bytes). Each cut prefers the last newline
//! in reach, so lines stay whole whenever they can:
//!
//! ```text
//! limit = 11
//!
//! "line1\nline2\nline3"  ->  ["line1", "line2\nline3"]
//!       ^ cut here, newline consumed
//! ```
//!
//! A window with no newline is cut hard at exactly `limit`.
//!
//! ## File Mode
//!
//! Paths are grouped into batches of at most `max_files`. Each batch becomes
//! one multipart request with fields `file[0]`, `file[1]`, ..., the index
//! restarting at zero for every batch:
//!
//! ```text
//! max_files = 10, 11 paths  ->  [10 files] [1 file]
//! ```
//!
//! ## Transmission
//!
//! Requests go out strictly one after another, each response read in full
//! and written to the output before the next request is built. The first
//! failure (unreadable file, network error, ...) stops the run and reports
//! which chunk or batch it happened in.
//!
//! ## Quick Start
//!
//! ```rust
//! use courier::{split_content, batch_paths};
//!
//! let chunks = split_content("line1\nline2\nline3", 11);
//! assert_eq!(chunks, ["line1", "line2\nline3"]);
//!
//! let paths: Vec<String> = (0..11).map(|i| format!("{i}.png")).collect();
//! let batches = batch_paths(&paths, 10);
//! assert_eq!(batches[0].len(), 10);
//! assert_eq!(batches[1], ["10.png"]);
//! ```
//!
//! Sending through a real endpoint:
//!
//! ```rust,no_run
//! use courier::{relay, Config, Input, ReqwestTransport};
//!
//! let config = Config::from_env()?;
//! let transport = ReqwestTransport::new(config.endpoint.clone())?;
//! let input = Input::Text("deploy finished".into());
//!
//! relay(&config, input, transport, &mut std::io::stdout())?;
//! # Ok::<(), courier::Error>(())
//! ```

mod batch;
mod chunk;
mod config;
mod error;
mod input;
mod payload;
mod source;
mod split;
mod transmit;
mod transport;

use std::io::Write;

pub use batch::{batch_paths, Batch, FileBatcher};
pub use chunk::{reassemble, Chunk, Cut};
pub use config::{Config, Limits, ENDPOINT_ENV, MAX_CONTENT_LENGTH, MAX_FILES};
pub use error::{Error, Result, Unit};
pub use input::Input;
pub use payload::{field_name, FilePart, Payload};
pub use source::{FileSource, MemorySource, PathSource};
pub use split::{split_content, ContentSplitter, HardCut};
pub use transmit::{Summary, Transmitter};
pub use transport::{MockTransport, ReqwestTransport, Response, Transport};

/// Run one relay: send `input` through `transport`, writing every response
/// body to `out` in order.
///
/// # Errors
///
/// Returns the first error encountered; see [`Transmitter`].
pub fn relay<T, W>(config: &Config, input: Input, transport: T, out: &mut W) -> Result<Summary>
where
    T: Transport,
    W: Write,
{
    relay_with(config, input, transport, HardCut::default(), out)
}

/// [`relay`] with an explicit hard-cut policy for text mode.
///
/// # Errors
///
/// Returns the first error encountered; see [`Transmitter`].
pub fn relay_with<T, W>(
    config: &Config,
    input: Input,
    transport: T,
    hard_cut: HardCut,
    out: &mut W,
) -> Result<Summary>
where
    T: Transport,
    W: Write,
{
    let transmitter = Transmitter::new(transport, config.limits).with_hard_cut(hard_cut);

    match input {
        Input::Files(paths) => {
            transmitter.send_files(paths.into_iter().map(PathSource::new), out)
        }
        Input::Text(content) => transmitter.send_text(&content, out),
    }
}
