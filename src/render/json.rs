//! JSON rendering for canvases.

use crate::canvas::MemoryCanvas;
use crate::error::Result;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a canvas to JSON.
///
/// The output loads back with [`MemoryCanvas::from_json`].
pub fn to_json(canvas: &MemoryCanvas, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(canvas)?,
        JsonFormat::Compact => serde_json::to_string(canvas)?,
    };
    Ok(json)
}
