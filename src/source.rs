//! File references that are opened only when their batch is sent.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;

/// Something that can be attached to a request: a logical name plus a way
/// to open its bytes for reading.
///
/// `open` is called once, while the request for the owning batch is being
/// built, and the returned reader is dropped before that request goes out.
pub trait FileSource {
    /// Name reported to the endpoint as the part's filename.
    fn name(&self) -> &str;

    /// Open the content for reading.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// A file on the local filesystem, named by the path string it was given as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSource {
    name: String,
    path: PathBuf,
}

impl PathSource {
    /// Reference the file at `path`. Nothing is checked until it is opened.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let name = path.into();
        Self {
            path: PathBuf::from(&name),
            name,
        }
    }
}

impl FileSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

/// An in-memory file, for tests and generated attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Create an in-memory file.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }
}
