//! Rendering and writing of command results.
//!
//! # Submodules
//!
//! - [`json`]: pretty-printed JSON of any serializable result
//! - [`markdown`]: human-readable Markdown for summaries, articles and reports
//!
//! Rendered text goes to stdout unless an output path is given.

use crate::error::Result;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument};

pub mod json;
pub mod markdown;

/// Write rendered output to `path`, or to stdout when `path` is `None`.
///
/// # Arguments
///
/// * `rendered` - The text to write; a trailing newline is added if missing
/// * `path` - Destination file. Parent directories are created as needed.
#[instrument(level = "info", skip(rendered), fields(bytes = rendered.len()))]
pub async fn write_output(rendered: &str, path: Option<&Path>) -> Result<()> {
    let mut text = rendered.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = fs::create_dir_all(parent).await {
                    error!(dir = %parent.display(), error = %e, "Failed to create output dir");
                    return Err(e.into());
                }
            }
            fs::write(path, text).await?;
            info!(path = %path.display(), "Wrote output file");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(text.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
