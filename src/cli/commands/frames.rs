//! `frames`: print the tick timeline in virtual time.

use std::io::Write;

use crate::cli::args::{FramesArgs, OutputFormat};
use crate::error::TypecycleError;
use crate::rotator::{Frame, Rotator, Timing};

use super::resolve_source;

/// Prints every tick of `--cycles` complete passes, one per line.
///
/// # Errors
///
/// Returns a config error for bad sources or an I/O error if stdout fails.
pub fn run(args: &FramesArgs) -> Result<(), TypecycleError> {
    let config = resolve_source(&args.source)?;
    let rotator = Rotator::new(config.phrase_list()?, Timing::from(config.timing));

    let mut out = std::io::stdout().lock();
    if args.format == OutputFormat::Human {
        writeln!(
            out,
            "# {} phrases, {} per cycle",
            rotator.phrases().len(),
            humantime::format_duration(rotator.cycle_duration())
        )?;
    }

    write_frames(&mut out, rotator, args.cycles, args.format)
}

/// Writes frames up to and including the tick that completes cycle
/// `cycles`.
fn write_frames<W: Write>(
    out: &mut W,
    rotator: Rotator,
    cycles: u64,
    format: OutputFormat,
) -> Result<(), TypecycleError> {
    for frame in rotator.frames() {
        match format {
            OutputFormat::Human => writeln!(out, "{}", human_line(&frame))?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &frame)?;
                writeln!(out)?;
            }
        }
        if frame.cycles >= cycles {
            break;
        }
    }
    out.flush()?;
    Ok(())
}

fn human_line(frame: &Frame) -> String {
    let text = frame
        .text
        .as_deref()
        .map_or_else(|| "-".to_string(), |t| format!("{t:?}"));
    format!(
        "{:>8}ms  {:<7}  [{}] {text}",
        frame.at.as_millis(),
        frame.kind.as_str(),
        frame.phrase_index
    )
}
