//! Request bodies, built one chunk or batch at a time.

use std::io::Read;

use serde::Serialize;

use crate::{Batch, Error, FileSource, Result};

/// Field name for the file at `index` within its batch.
#[must_use]
pub fn field_name(index: usize) -> String {
    format!("file[{index}]")
}

/// JSON message body: `{"content": "..."}`.
#[derive(Debug, Serialize)]
struct Message<'a> {
    content: &'a str,
}

/// One file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name, `file[i]`.
    pub field: String,
    /// Filename reported for the part (the path as given).
    pub file_name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

/// A fully built request body. Exactly one kind is used per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Encoded JSON message for one text chunk.
    Json {
        /// UTF-8 JSON bytes.
        body: Vec<u8>,
    },
    /// Multipart form for one file batch.
    Multipart {
        /// Parts in field order.
        parts: Vec<FilePart>,
    },
}

impl Payload {
    /// Encode a text chunk as a JSON message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if serialization fails.
    pub fn text(content: &str) -> Result<Self> {
        let body = serde_json::to_vec(&Message { content })?;
        Ok(Payload::Json { body })
    }

    /// Read every file of a batch into a multipart payload.
    ///
    /// Each source is opened, read to the end, and closed before the next
    /// one is touched. The first failure stops the batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] or [`Error::Read`] naming the failing file.
    pub fn files<S: FileSource>(batch: &Batch<S>) -> Result<Self> {
        let mut parts = Vec::with_capacity(batch.len());

        for (i, source) in batch.iter() {
            let name = source.name();
            let mut bytes = Vec::new();
            {
                let mut reader = source.open().map_err(|err| Error::Open {
                    name: name.to_string(),
                    source: err,
                })?;
                reader.read_to_end(&mut bytes).map_err(|err| Error::Read {
                    name: name.to_string(),
                    source: err,
                })?;
            }
            tracing::trace!(field = i, file = name, bytes = bytes.len(), "attached file");

            parts.push(FilePart {
                field: field_name(i),
                file_name: name.to_string(),
                bytes,
            });
        }

        Ok(Payload::Multipart { parts })
    }

    /// Total body size before transport framing.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Payload::Json { body } => body.len(),
            Payload::Multipart { parts } => parts.iter().map(|p| p.bytes.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileBatcher, MemorySource, PathSource};

    #[test]
    fn test_text_payload_escapes() {
        let payload = Payload::text("say \"hi\"\nbye").unwrap();
        let Payload::Json { body } = payload else {
            panic!("expected json");
        };
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "content": "say \"hi\"\nbye" }));
    }

    #[test]
    fn test_files_payload_fields_restart_per_batch() {
        let sources = vec![
            MemorySource::new("a.txt", "A"),
            MemorySource::new("b.txt", "B"),
            MemorySource::new("c.txt", "C"),
        ];
        let batches = FileBatcher::new(2).batch(sources);

        let Payload::Multipart { parts } = Payload::files(&batches[1]).unwrap() else {
            panic!("expected multipart");
        };
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].field, "file[0]");
        assert_eq!(parts[0].file_name, "c.txt");
        assert_eq!(parts[0].bytes, b"C");
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let batches = FileBatcher::new(10).batch([PathSource::new("/nonexistent/courier-test")]);
        let err = Payload::files(&batches[0]).unwrap_err();
        assert!(matches!(err, Error::Open { ref name, .. } if name == "/nonexistent/courier-test"));
    }

    #[test]
    fn test_size() {
        let batches = FileBatcher::new(10).batch([
            MemorySource::new("a", vec![0u8; 3]),
            MemorySource::new("b", vec![0u8; 4]),
        ]);
        assert_eq!(Payload::files(&batches[0]).unwrap().size(), 7);
        assert_eq!(Payload::text("x").unwrap().size(), br#"{"content":"x"}"#.len());
    }
}
