//! Relay Without a Network
//!
//! Split a log into webhook-sized messages and send it through a recording
//! transport, then attach a handful of in-memory files.
//!
//! ```bash
//! cargo run --example relay_mock
//! ```

use courier::{Limits, MemorySource, MockTransport, Payload, Transmitter};

fn main() -> courier::Result<()> {
    let log = "build started\n\
        compiling courier v0.1.0\n\
        warning: unused variable `x`\n\
        finished release profile in 12.4s\n\
        deploying to staging\n\
        deploy ok";

    let mock = MockTransport::new();
    let transmitter = Transmitter::new(mock.clone(), Limits::new(60, 2)?);

    let mut out = Vec::new();
    let summary = transmitter.send_text(log, &mut out)?;
    println!("Text: {} requests\n", summary.requests);

    for (i, payload) in mock.calls().iter().enumerate() {
        if let Payload::Json { body } = payload {
            println!("[{i}] {}", String::from_utf8_lossy(body));
        }
    }

    // Five attachments with a limit of two per request: 2 + 2 + 1.
    let files: Vec<MemorySource> = (1..=5)
        .map(|i| MemorySource::new(format!("shot{i}.png"), vec![0u8; i * 100]))
        .collect();

    let before = mock.call_count();
    let summary = transmitter.send_files(files, &mut out)?;
    println!("\nFiles: {} requests", summary.requests);

    for payload in &mock.calls()[before..] {
        if let Payload::Multipart { parts } = payload {
            let fields: Vec<String> = parts
                .iter()
                .map(|p| format!("{}={}", p.field, p.file_name))
                .collect();
            println!("  {}", fields.join(", "));
        }
    }

    Ok(())
}
