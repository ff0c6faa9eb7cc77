//! JSON rendering of command results.
//!
//! Everything the crawler returns derives `Serialize`, so one generic renderer
//! covers search hits, articles, reports and the source catalog.

use crate::error::Result;
use serde::Serialize;
use tracing::{debug, instrument};

/// Serialize `value` as pretty-printed JSON.
#[instrument(level = "debug", skip_all)]
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string_pretty(value)?;
    debug!(bytes = json.len(), "Rendered JSON");
    Ok(json)
}
