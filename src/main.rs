//! courier: relay text or files to a webhook.
//!
//! ```bash
//! export DISCORD_WEBHOOK_URL=https://discord.com/api/webhooks/...
//!
//! courier "build finished"              # text from arguments
//! make 2>&1 | courier                   # text from stdin, split at 2000 chars
//! courier -f shot1.png -f shot2.png     # attachments, 10 per request
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use courier::{relay_with, Config, HardCut, Input, Limits, ReqwestTransport};

/// Post text or files to a webhook, split to fit its limits.
///
/// Text is taken from the trailing arguments, or from standard input when
/// there are none. Response bodies are printed to standard output.
#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(version, about, long_about = None)]
struct Args {
    /// Attach a file (repeatable). Switches to file mode.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    files: Vec<String>,

    /// Webhook URL
    #[arg(long, env = courier::ENDPOINT_ENV, hide_env_values = true)]
    endpoint: Option<String>,

    /// Maximum message length in characters
    #[arg(long, default_value_t = courier::MAX_CONTENT_LENGTH)]
    max_content_length: usize,

    /// Maximum attachments per request
    #[arg(long, default_value_t = courier::MAX_FILES)]
    max_files: usize,

    /// Never cut inside a grapheme cluster when a line must be broken
    #[arg(long)]
    grapheme_safe: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Message text
    #[arg(value_name = "TEXT", trailing_var_arg = true)]
    text: Vec<String>,
}

/// Build the log filter. `RUST_LOG`, when set, wins over `-v`.
fn log_filter(verbose: u8, env: Option<&str>) -> Result<EnvFilter> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(env.unwrap_or_default())
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    Ok(filter)
}

fn setup_logging(verbose: u8) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, env.as_deref())?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    Ok(())
}

fn run(args: Args) -> Result<()> {
    let limits = Limits::new(args.max_content_length, args.max_files)?;
    let config = Config::new(args.endpoint.as_deref(), limits)?;
    let transport = ReqwestTransport::new(config.endpoint.clone())?;

    let input = Input::resolve(args.files, &args.text, io::stdin().lock())?;
    let hard_cut = if args.grapheme_safe {
        HardCut::Grapheme
    } else {
        HardCut::Scalar
    };

    let mut stdout = io::stdout().lock();
    let summary = relay_with(&config, input, transport, hard_cut, &mut stdout)?;
    stdout.flush().map_err(courier::Error::Output)?;

    if summary.rejected > 0 {
        tracing::warn!(
            rejected = summary.rejected,
            requests = summary.requests,
            "some requests were rejected by the endpoint"
        );
    }
    tracing::info!(requests = summary.requests, bytes = summary.bytes, "done");

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = setup_logging(args.verbose) {
        eprintln!("courier: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("courier: {e:#}");
            ExitCode::FAILURE
        }
    }
}
