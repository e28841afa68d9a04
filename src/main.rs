//! Replays a recorded controller input trace through a viewer session and
//! logs the outcome.

use std::path::Path;
use std::process::ExitCode;

use web_time::Duration;
use xrview::session::Trace;
use xrview::{Options, XrViewError};

/// How long a replay waits for each property lookup.
const SETTLE: Duration = Duration::from_secs(2);

fn run(trace_path: &Path, options_path: Option<&Path>) -> Result<(), XrViewError> {
    let options = match options_path {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let trace = Trace::load(trace_path)?;
    log::info!(
        "replaying {} frame(s) over {} model(s) from {}",
        trace.frames.len(),
        trace.models.len(),
        trace_path.display()
    );

    let summary = trace.replay(options, SETTLE)?;
    log::info!(
        "{} frame(s), {} skipped, {} haptic pulse(s)",
        summary.frames,
        summary.skipped_frames,
        summary.pulses
    );
    log::info!(
        "anchor at {} facing {}, mode {:?}",
        summary.anchor.position,
        summary.anchor.forward(),
        summary.mode
    );
    if let Some(element) = summary.highlighted {
        log::info!("highlighted {element:?}");
    }
    for line in &summary.panel_lines {
        log::info!("panel: {line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let mut args = std::env::args().skip(1);
    let Some(trace) = args.next() else {
        log::error!("Usage: xrview <trace.json> [options.toml]");
        return ExitCode::FAILURE;
    };
    let options = args.next();

    match run(Path::new(&trace), options.as_deref().map(Path::new)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
