// UI layer: prints the analysis of one image to a writer. Failures of the
// analysis itself are reported as text and never returned; only a broken
// writer is an error here.

use crate::api::{read_image, VisionClient};
use crate::error::VisionError;
use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::error;

/// Analyze `path` and write the caption followed by the raw response.
///
/// A path that is not a readable file prints "Invalid file path" and no
/// request is made.
pub fn describe_image<W: Write>(
    client: &VisionClient,
    path: &Path,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Analyze an image:")?;

    let bytes = match read_image(path) {
        Ok(bytes) => bytes,
        Err(VisionError::FileNotFound(_)) => {
            writeln!(out, "\nInvalid file path")?;
            return Ok(());
        }
        Err(e) => return report_error(&e, out),
    };

    writeln!(out, "\nWait for the results to appear.\n")?;
    out.flush()?;

    // The spinner draws on stderr and stays hidden when it is not a terminal.
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Analyzing...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = client.analyze_bytes(bytes);
    spinner.finish_and_clear();

    match outcome {
        Ok(result) => {
            writeln!(out, "{}", result.caption)?;
            writeln!(out)?;
            writeln!(out, "\nResponse:\n\n{}\n", result.pretty_json())?;
        }
        Err(e) => report_error(&e, out)?,
    }
    Ok(())
}

/// Print a failure the way the rest of the output looks. Used for setup
/// errors in `main` as well, which never change the exit code.
pub fn report_error<W: Write>(err: &VisionError, out: &mut W) -> io::Result<()> {
    error!("Vision client error: {}", err);
    writeln!(out, "\n{}", err)
}

/// Ask the user for the image path when none was passed on the command line.
pub fn prompt_image_path() -> Result<PathBuf> {
    let path: String = Input::new().with_prompt("Image file path").interact_text()?;
    Ok(PathBuf::from(path.trim()))
}
