use anyhow::{bail, Context, Result};
use gotls_event::config;
use gotls_event::{ClockSource, EventRegistry, EventStruct, RenderConfig};
use log::{debug, warn};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::cli::{DecodeArgs, OutputFormat};

pub fn run(args: DecodeArgs) -> Result<()> {
    config::init(RenderConfig {
        color: !args.no_color,
        clock: if args.boot_clock {
            ClockSource::Boot
        } else {
            ClockSource::Monotonic
        },
    })?;

    let registry = EventRegistry::with_defaults();
    if !registry.contains(args.kind) {
        bail!("unknown event kind {}", args.kind);
    }

    let records = read_inputs(&args.inputs)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let decoded = decode_all(&registry, args.kind, args.format, &records, &mut out)?;
    debug!("decoded {} of {} records", decoded, records.len());
    Ok(())
}

/// Dispatch every record and write the rendered events to `out`.
///
/// Records that fail to decode are logged and skipped. Fails only when every record was
/// skipped. Returns the number of events written.
fn decode_all(
    registry: &EventRegistry,
    kind: u32,
    format: OutputFormat,
    records: &[(String, Vec<u8>)],
    out: &mut impl Write,
) -> Result<usize> {
    let mut dropped = 0usize;

    for (name, buf) in records {
        match registry.dispatch(kind, buf) {
            Ok(event) => {
                debug!("{}: decoded {} payload bytes", name, event.payload_len());
                out.write_all(render(event.as_ref(), format).as_bytes())?;
            }
            Err(e) => {
                warn!("{}: {}", name, e);
                dropped += 1;
            }
        }
    }
    out.flush()?;

    if dropped > 0 && dropped == records.len() {
        bail!("no record could be decoded");
    }
    Ok(records.len() - dropped)
}

fn render(event: &dyn EventStruct, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => event.summary(),
        OutputFormat::Hex => event.hex_dump(),
        OutputFormat::Json => {
            let mut s = event.structured();
            if !s.ends_with('\n') {
                s.push('\n');
            }
            s
        }
    }
}

fn read_inputs(paths: &[PathBuf]) -> Result<Vec<(String, Vec<u8>)>> {
    if paths.is_empty() {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read record from stdin")?;
        return Ok(vec![("<stdin>".to_string(), buf)]);
    }

    paths
        .iter()
        .map(|p| {
            let buf = std::fs::read(p)
                .with_context(|| format!("Failed to read {}", p.display()))?;
            Ok((p.display().to_string(), buf))
        })
        .collect()
}
