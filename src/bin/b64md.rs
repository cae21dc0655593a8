//! CLI binary for b64md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `EncodeConfig` and prints results.

use anyhow::{Context, Result};
use b64md::clipboard::copy_to_terminal;
use b64md::{encode_input, encode_to_file, EncodeConfig, EncodeOutput, OutputFormat};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Base64 of an image (stdout)
  b64md photo.png

  # Reference-style Markdown with an embedded data URL
  b64md -f markdown photo.png

  # Copy the Markdown to the clipboard via the terminal (OSC 52)
  b64md -f markdown --copy photo.png

  # Write to a file
  b64md -f markdown photo.png -o photo.md

  # Encode a remote image
  b64md -f markdown https://example.com/logo.svg

  # Pipe raw image data; name it for the Markdown label
  cat shot.heic | b64md -f markdown --filename shot.heic -

  # Reproducible output (fixed reference timestamp)
  b64md -f markdown --timestamp 2025-12-21T10:20:30Z photo.png

  # JSON with base64, markdown, and detected type
  b64md --json photo.png

TYPE DETECTION:
  The type indicator (a uniform type identifier such as public.png) comes from
  --type, else the download's Content-Type, else the file extension, else the
  file's magic bytes. The MIME type in the data URL is resolved from it, with
  the filename extension as a fallback and application/octet-stream last.

ENVIRONMENT VARIABLES:
  B64MD_FORMAT            Default output format (base64, markdown)
  RUST_LOG                Override log filter (e.g. b64md=debug)
"#;

/// Encode images as Base64 or as Markdown data-URL images.
#[derive(Parser, Debug)]
#[command(
    name = "b64md",
    version,
    about = "Encode images as Base64 or as Markdown data-URL images",
    long_about = "Read an image from a file, an HTTP(S) URL, or stdin and print its Base64 \
encoding, or a reference-style Markdown image whose link definition embeds a data: URL.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file path, HTTP/HTTPS URL, or '-' for stdin.
    input: String,

    /// Output format: base64 or markdown.
    #[arg(short, long, env = "B64MD_FORMAT", value_enum, default_value = "base64")]
    format: FormatArg,

    /// Write the output to this file instead of stdout.
    #[arg(short, long, env = "B64MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON (base64, markdown, and source info).
    #[arg(long, env = "B64MD_JSON")]
    json: bool,

    /// Also copy the output to the clipboard via the terminal (OSC 52).
    #[arg(long, env = "B64MD_COPY")]
    copy: bool,

    /// Display filename for the Markdown label and extension fallback.
    #[arg(long, env = "B64MD_FILENAME")]
    filename: Option<String>,

    /// Type indicator override, e.g. public.png or public.heic.
    #[arg(long = "type", env = "B64MD_TYPE", value_name = "UTI")]
    type_indicator: Option<String>,

    /// Reference timestamp: RFC 3339 (2025-12-21T10:20:30Z) or Unix seconds.
    #[arg(long, env = "B64MD_TIMESTAMP", value_parser = parse_timestamp)]
    timestamp: Option<OffsetDateTime>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "B64MD_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Reject inputs larger than this many bytes.
    #[arg(long, env = "B64MD_MAX_BYTES", default_value_t = b64md::config::DEFAULT_MAX_INPUT_BYTES)]
    max_bytes: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "B64MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result itself.
    #[arg(short, long, env = "B64MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Base64,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Base64 => OutputFormat::Base64,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = if let Some(ref output_path) = cli.output {
        let output = encode_to_file(&cli.input, output_path, &config)
            .await
            .context("Encoding failed")?;
        if !cli.quiet {
            eprintln!(
                "{}  {}  →  {}",
                green("✔"),
                summary(&output),
                bold(&output_path.display().to_string()),
            );
        }
        output
    } else {
        let output = encode_input(&cli.input, &config)
            .await
            .context("Encoding failed")?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_output(&mut handle, &output, cli.json)?;
        drop(handle);

        if !cli.quiet {
            eprintln!("{}  {}", green("✔"), summary(&output));
        }
        output
    };

    if cli.copy {
        copy_to_terminal(output.text()).context("Failed to copy to clipboard")?;
        if !cli.quiet {
            eprintln!("   {}", dim(&format!("copied {} to clipboard", output.format)));
        }
    }

    Ok(())
}

/// Print the selected text (or JSON) with a trailing newline.
///
/// Only the result goes to `out`; the clipboard escape has its own writer.
fn write_output<W: Write>(out: &mut W, output: &EncodeOutput, json: bool) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        writeln!(out, "{json}").context("Failed to write to stdout")?;
    } else {
        out.write_all(output.text().as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure a trailing newline on stdout.
        if !output.text().ends_with('\n') {
            out.write_all(b"\n").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Map CLI args to `EncodeConfig`.
fn build_config(cli: &Cli) -> Result<EncodeConfig> {
    let mut builder = EncodeConfig::builder()
        .output_format(cli.format.into())
        .download_timeout_secs(cli.download_timeout)
        .max_input_bytes(cli.max_bytes);

    if let Some(ref name) = cli.filename {
        builder = builder.filename(name);
    }
    if let Some(ref id) = cli.type_indicator {
        builder = builder.type_indicator(id);
    }
    if let Some(ts) = cli.timestamp {
        builder = builder.timestamp(ts);
    }

    builder.build().context("Invalid configuration")
}

/// One-line description for stderr.
fn summary(output: &EncodeOutput) -> String {
    format!(
        "{}  {}  {}",
        bold(&output.source.filename),
        dim(&format!("{} bytes", output.source.byte_len)),
        dim(&output.source.mime_type),
    )
}

/// Parse `--timestamp` as RFC 3339 or Unix seconds.
fn parse_timestamp(s: &str) -> Result<OffsetDateTime> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return OffsetDateTime::from_unix_timestamp(secs)
            .with_context(|| format!("Unix timestamp out of range: {secs}"));
    }
    OffsetDateTime::parse(s, &Rfc3339)
        .with_context(|| format!("Invalid timestamp '{s}': expected RFC 3339 or Unix seconds"))
}
