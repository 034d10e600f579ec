//! End-to-end behavior of a relay run against a recording transport.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use courier::{
    relay, Config, Error, FileSource, Input, Limits, MemorySource, MockTransport, Payload,
    Response, Transmitter, Transport, Unit,
};

// =============================================================================
// Helpers
// =============================================================================

fn config(max_content_len: usize, max_files: usize) -> Config {
    Config::new(
        Some("https://example.com/api/webhooks/1/token"),
        Limits::new(max_content_len, max_files).unwrap(),
    )
    .unwrap()
}

fn contents(calls: &[Payload]) -> Vec<String> {
    calls
        .iter()
        .map(|p| match p {
            Payload::Json { body } => {
                let value: serde_json::Value = serde_json::from_slice(body).unwrap();
                value["content"].as_str().unwrap().to_string()
            }
            Payload::Multipart { .. } => panic!("expected a text payload"),
        })
        .collect()
}

fn file_names(calls: &[Payload]) -> Vec<Vec<(String, String)>> {
    calls
        .iter()
        .map(|p| match p {
            Payload::Multipart { parts } => parts
                .iter()
                .map(|part| (part.field.clone(), part.file_name.clone()))
                .collect(),
            Payload::Json { .. } => panic!("expected a multipart payload"),
        })
        .collect()
}

/// A source whose reads fail after opening.
struct Unreadable;

impl FileSource for Unreadable {
    fn name(&self) -> &str {
        "unreadable.bin"
    }

    fn open(&self) -> io::Result<Box<dyn io::Read + '_>> {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
        }
        Ok(Box::new(Broken))
    }
}

/// A writer that refuses everything.
struct ClosedPipe;

impl io::Write for ClosedPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A source that counts its opens and how many of its readers are alive.
struct Counted {
    name: String,
    bytes: Vec<u8>,
    opens: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
}

impl FileSource for Counted {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn io::Read + '_>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountedReader {
            inner: &self.bytes,
            live: &self.live,
        }))
    }
}

struct CountedReader<'a> {
    inner: &'a [u8],
    live: &'a AtomicUsize,
}

impl io::Read for CountedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.inner, buf)
    }
}

impl Drop for CountedReader<'_> {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Records, at every post, how many readers are alive and each source's
/// open count.
struct Observed {
    inner: MockTransport,
    live: Arc<AtomicUsize>,
    opens: Vec<Arc<AtomicUsize>>,
    seen: Mutex<Vec<(usize, Vec<usize>)>>,
}

impl Transport for Observed {
    fn post(&self, payload: Payload) -> courier::Result<Response> {
        let opens = self.opens.iter().map(|o| o.load(Ordering::SeqCst)).collect();
        self.seen
            .lock()
            .unwrap()
            .push((self.live.load(Ordering::SeqCst), opens));
        self.inner.post(payload)
    }
}

// =============================================================================
// Text mode
// =============================================================================

#[test]
fn text_is_sent_as_ordered_json_messages() {
    let mock = MockTransport::new();
    for body in ["<1>", "<2>", "<3>"] {
        mock.push_response(200, body);
    }

    let input = Input::Text("first line\nsecond line\nthird line\n".into());
    let mut out = Vec::new();
    let summary = relay(&config(12, 10), input, mock.clone(), &mut out).unwrap();

    assert_eq!(summary.requests, 3);
    assert_eq!(
        contents(&mock.calls()),
        ["first line", "second line", "third line"]
    );
    assert_eq!(out, b"<1><2><3>");
}

#[test]
fn long_text_without_newlines_is_hard_cut() {
    let mock = MockTransport::new();
    let text = "x".repeat(4500);

    let mut out = Vec::new();
    relay(&config(2000, 10), Input::Text(text), mock.clone(), &mut out).unwrap();

    let sent = contents(&mock.calls());
    let lengths: Vec<usize> = sent.iter().map(|s| s.chars().count()).collect();
    assert_eq!(lengths, [2000, 2000, 500]);
}

#[test]
fn transport_failure_aborts_remaining_chunks() {
    let mock = MockTransport::new();
    mock.push_response(200, "a");
    mock.push_failure("connection refused");
    mock.push_response(200, "never");

    let mut out = Vec::new();
    let err = relay(
        &config(4, 10),
        Input::Text("one\ntwo\nsix\nten".into()),
        mock.clone(),
        &mut out,
    )
    .unwrap_err();

    match err {
        Error::Aborted {
            unit,
            index,
            total,
            source,
        } => {
            assert_eq!(unit, Unit::Chunk);
            assert_eq!(index, 1);
            assert_eq!(total, 4);
            assert!(matches!(*source, Error::Transport(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(mock.call_count(), 2);
    assert_eq!(out, b"a");
}

#[test]
fn output_failure_aborts() {
    let mock = MockTransport::new();
    mock.push_response(200, "body");

    let err = relay(
        &config(2000, 10),
        Input::Text("hello".into()),
        mock.clone(),
        &mut ClosedPipe,
    )
    .unwrap_err();

    assert_eq!(err.failed_index(), Some(0));
    assert_eq!(mock.call_count(), 1);
}

// =============================================================================
// File mode
// =============================================================================

#[test]
fn files_are_batched_with_restarting_field_indices() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<String> = (0..12)
        .map(|i| {
            let path = dir.path().join(format!("{i:02}.txt"));
            std::fs::write(&path, format!("file {i}")).unwrap();
            path.to_string_lossy().into_owned()
        })
        .collect();

    let mock = MockTransport::new();
    let mut out = Vec::new();
    let summary = relay(
        &config(2000, 10),
        Input::Files(paths.clone()),
        mock.clone(),
        &mut out,
    )
    .unwrap();

    assert_eq!(summary.requests, 2);
    let batches = file_names(&mock.calls());
    assert_eq!(batches[0].len(), 10);
    assert_eq!(batches[1].len(), 2);
    assert_eq!(batches[1][0], ("file[0]".to_string(), paths[10].clone()));
    assert_eq!(batches[1][1], ("file[1]".to_string(), paths[11].clone()));

    let calls = mock.calls();
    let Payload::Multipart { parts } = &calls[0] else {
        panic!("expected multipart");
    };
    assert_eq!(parts[3].bytes, b"file 3");
}

#[test]
fn missing_file_fails_only_its_own_batch() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("present.txt");
    std::fs::write(&present, "here").unwrap();
    let present = present.to_string_lossy().into_owned();
    let missing = dir.path().join("missing.txt").to_string_lossy().into_owned();

    let mock = MockTransport::new();
    let mut out = Vec::new();
    let err = relay(
        &config(2000, 1),
        Input::Files(vec![present, missing.clone()]),
        mock.clone(),
        &mut out,
    )
    .unwrap_err();

    // First batch went out before the second batch's file was opened.
    assert_eq!(mock.call_count(), 1);
    match err {
        Error::Aborted { unit, index, source, .. } => {
            assert_eq!(unit, Unit::Batch);
            assert_eq!(index, 1);
            assert!(matches!(*source, Error::Open { ref name, .. } if *name == missing));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn files_are_opened_once_and_closed_before_their_request() {
    let live = Arc::new(AtomicUsize::new(0));
    let sources: Vec<Counted> = (0..5u8)
        .map(|i| Counted {
            name: format!("f{i}"),
            bytes: vec![i; 8],
            opens: Arc::default(),
            live: Arc::clone(&live),
        })
        .collect();
    let opens: Vec<Arc<AtomicUsize>> = sources.iter().map(|s| Arc::clone(&s.opens)).collect();

    let transport = Observed {
        inner: MockTransport::new(),
        live: Arc::clone(&live),
        opens: opens.clone(),
        seen: Mutex::default(),
    };
    let transmitter = Transmitter::new(transport, Limits::new(2000, 2).unwrap());

    let mut out = Vec::new();
    let summary = transmitter.send_files(sources, &mut out).unwrap();
    assert_eq!(summary.requests, 3);

    // No reader alive at any post; later batches untouched until reached.
    let seen = transmitter.transport().seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        [
            (0, vec![1, 1, 0, 0, 0]),
            (0, vec![1, 1, 1, 1, 0]),
            (0, vec![1, 1, 1, 1, 1]),
        ]
    );
    assert!(opens.iter().all(|o| o.load(Ordering::SeqCst) == 1));
    assert_eq!(live.load(Ordering::SeqCst), 0);

    let calls = transmitter.transport().inner.calls();
    let Payload::Multipart { parts } = &calls[2] else {
        panic!("expected multipart");
    };
    assert_eq!(parts[0].bytes, [4u8; 8]);
}

#[test]
fn read_failure_is_reported_with_name() {
    let mock = MockTransport::new();
    let transmitter = Transmitter::new(mock.clone(), Limits::default());

    let mut out = Vec::new();
    let err = transmitter.send_files([Unreadable], &mut out).unwrap_err();

    let Error::Aborted { source, .. } = err else {
        panic!("expected abort");
    };
    assert!(matches!(*source, Error::Read { ref name, .. } if name == "unreadable.bin"));
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn in_memory_sources() {
    let mock = MockTransport::new();
    mock.push_response(200, r#"{"id":"1"}"#);

    let transmitter = Transmitter::new(mock.clone(), Limits::default());
    let mut out = Vec::new();
    transmitter
        .send_files(
            [
                MemorySource::new("report.csv", "a,b\n1,2\n"),
                MemorySource::new("chart.png", vec![0x89, b'P', b'N', b'G']),
            ],
            &mut out,
        )
        .unwrap();

    assert_eq!(
        file_names(&mock.calls()),
        [vec![
            ("file[0]".to_string(), "report.csv".to_string()),
            ("file[1]".to_string(), "chart.png".to_string()),
        ]]
    );
    assert_eq!(out, br#"{"id":"1"}"#);
}
