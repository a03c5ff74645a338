// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules together for a single image.
//
// Module responsibilities:
// - `config`: Credentials and client settings, optionally read from the
//   environment.
// - `api`: The blocking client for the vision analyze endpoint and the
//   response types.
// - `error`: The error taxonomy shared by the modules above.
// - `ui`: Console output of a caption and the raw response.
pub mod api;
pub mod config;
pub mod error;
pub mod ui;

pub use api::{AnalysisResult, VisionClient};
pub use config::{ClientConfig, Credentials};
pub use error::{VisionError, VisionResult};
