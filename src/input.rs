//! Choosing between text and file mode.

use std::io::Read;

use crate::{Error, Result};

/// What a run relays. Exactly one mode per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Paths to attach, in the order given.
    Files(Vec<String>),
    /// Text to post as messages.
    Text(String),
}

impl Input {
    /// Pick the input for a run.
    ///
    /// Files win if any were given. Otherwise the trailing arguments are
    /// joined with single spaces, and with no arguments at all the whole of
    /// `stdin` is read. Invalid UTF-8 on stdin is replaced with U+FFFD
    /// rather than rejected.
    ///
    /// `stdin` is not touched unless it is needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stdin`] if reading stdin fails.
    pub fn resolve<R: Read>(files: Vec<String>, args: &[String], mut stdin: R) -> Result<Self> {
        if !files.is_empty() {
            return Ok(Input::Files(files));
        }
        if !args.is_empty() {
            return Ok(Input::Text(args.join(" ")));
        }

        let mut bytes = Vec::new();
        stdin.read_to_end(&mut bytes).map_err(Error::Stdin)?;
        tracing::debug!(bytes = bytes.len(), "read content from stdin");
        Ok(Input::Text(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_files_take_precedence() {
        let input =
            Input::resolve(vec!["a.png".into()], &["ignored".to_string()], FailingReader).unwrap();
        assert_eq!(input, Input::Files(vec!["a.png".into()]));
    }

    #[test]
    fn test_args_joined_with_spaces() {
        let args = ["hello".to_string(), "world".to_string()];
        let input = Input::resolve(vec![], &args, FailingReader).unwrap();
        assert_eq!(input, Input::Text("hello world".into()));
    }

    #[test]
    fn test_stdin_read_when_no_args() {
        let input = Input::resolve(vec![], &[], &b"from stdin\n"[..]).unwrap();
        assert_eq!(input, Input::Text("from stdin\n".into()));
    }

    #[test]
    fn test_stdin_invalid_utf8_is_replaced() {
        let input = Input::resolve(vec![], &[], &b"ok \xff"[..]).unwrap();
        assert_eq!(input, Input::Text("ok \u{fffd}".into()));
    }

    #[test]
    fn test_stdin_failure() {
        let result = Input::resolve(vec![], &[], FailingReader);
        assert!(matches!(result, Err(Error::Stdin(_))));
    }
}
