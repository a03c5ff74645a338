// Entrypoint for the CLI application.
// - Keeps `main` small: build the client from the environment, pick the
//   image path, and hand both to the UI.
// - Every failure, setup included, is printed to stdout and the process
//   still exits successfully. Only a broken stdout is returned as an error.

use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vision_caption_cli::{ui, ClientConfig, VisionClient};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries the caption and response.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Credentials come from `VISION_SUBSCRIPTION_KEY` and `VISION_ENDPOINT`.
    // See `config::ClientConfig::from_env`.
    let client = match ClientConfig::from_env().and_then(VisionClient::new) {
        Ok(client) => client,
        Err(e) => {
            ui::report_error(&e, &mut out)?;
            return Ok(());
        }
    };

    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match ui::prompt_image_path() {
            Ok(path) => path,
            Err(e) => {
                writeln!(out, "\n{}", e)?;
                return Ok(());
            }
        },
    };

    ui::describe_image(&client, &path, &mut out)?;
    Ok(())
}
