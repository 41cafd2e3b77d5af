//! `labelforge` -- generate article labels and deliver them to a raw-TCP
//! label printer.

mod render;

use std::ops::ControlFlow;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};

use labelforge_batch::{BatchOptions, FailurePolicy, print_batch};
use labelforge_core::{LabelSpec, build_document};
use labelforge_print_client::{PrinterEndpoint, TcpTransport, TransportConfig};

use crate::render::Format;

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "labelforge",
    version,
    about = "Generate ZPL article labels and deliver them to a raw-TCP label printer"
)]
struct Cli {
    /// Output mode: "pretty" for terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Article attributes shared by every subcommand.
#[derive(Args, Debug)]
struct LabelArgs {
    /// Article SKU.
    #[arg(long)]
    sku: String,

    /// Article description.
    #[arg(long)]
    description: String,

    /// Article color.
    #[arg(long)]
    color: String,

    /// Article size.
    #[arg(long)]
    size: String,

    /// Per-unit quantity printed on the label (not the label count).
    #[arg(long)]
    qty: String,

    /// Number of labels to emit.
    #[arg(long)]
    count: u32,

    /// Label date, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl LabelArgs {
    fn into_spec(self) -> Result<LabelSpec> {
        let date = match self.date.as_deref() {
            Some(s) => LabelSpec::parse_date(s)?,
            None => Local::now().date_naive(),
        };
        Ok(LabelSpec {
            sku: self.sku,
            description: self.description,
            color: self.color,
            size: self.size,
            qty: self.qty,
            count: self.count,
            date,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render a batch of labels and deliver them to the printer.
    Print {
        #[command(flatten)]
        label: LabelArgs,

        /// Printer endpoint, host[:port]. Port defaults to 9100; the
        /// endpoint defaults to the configured plant printer.
        #[arg(long)]
        printer: Option<String>,

        /// Stop at the first failed delivery instead of attempting the
        /// remaining labels.
        #[arg(long)]
        abort_on_failure: bool,

        /// TCP connect timeout, seconds.
        #[arg(long, default_value_t = 5)]
        connect_timeout: u64,

        /// Document write timeout, seconds.
        #[arg(long, default_value_t = 30)]
        write_timeout: u64,
    },

    /// Render label documents without touching a printer.
    Preview {
        #[command(flatten)]
        label: LabelArgs,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Print {
            label,
            printer,
            abort_on_failure,
            connect_timeout,
            write_timeout,
        } => cmd_print(
            label,
            printer.as_deref(),
            abort_on_failure,
            connect_timeout,
            write_timeout,
            format,
        ),
        Cmd::Preview { label } => cmd_preview(label, format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_print(
    label: LabelArgs,
    printer: Option<&str>,
    abort_on_failure: bool,
    connect_timeout: u64,
    write_timeout: u64,
    format: Format,
) -> Result<()> {
    let spec = label.into_spec()?;

    let endpoint = match printer {
        Some(s) => s
            .parse::<PrinterEndpoint>()
            .context("invalid --printer value")?,
        None => PrinterEndpoint::default(),
    };
    let endpoint_display = endpoint.to_string();

    let mut config = TransportConfig::default();
    config.connect_timeout = Duration::from_secs(connect_timeout);
    config.write_timeout = Duration::from_secs(write_timeout);
    let mut transport = TcpTransport::new(endpoint, config);

    let mut opts = BatchOptions::default();
    opts.policy = if abort_on_failure {
        FailurePolicy::AbortOnFailure
    } else {
        FailurePolicy::ContinueOnFailure
    };

    let receipt = print_batch(&mut transport, &spec, &opts, |_| ControlFlow::Continue(()))?;

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "printer": endpoint_display,
                "receipt": receipt,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => render::print_receipt(&receipt, &endpoint_display),
    }

    // Generated documents are in the output either way; a non-zero exit
    // signals that physical delivery fell short.
    if !receipt.fully_delivered() {
        process::exit(1);
    }
    Ok(())
}

fn cmd_preview(label: LabelArgs, format: Format) -> Result<()> {
    let spec = label.into_spec()?;
    spec.validate()?;

    let documents: Vec<_> = (1..=spec.count)
        .map(|seq| build_document(&spec, seq))
        .collect();

    match format {
        Format::Json => {
            let out = serde_json::json!({ "documents": documents });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for doc in &documents {
                print!("{}", doc.zpl);
            }
            eprintln!("{} document(s) rendered", documents.len());
        }
    }
    Ok(())
}
