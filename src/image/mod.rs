//! Preview image decoding and terminal rendering setup.
//!
//! Supports the terminal graphics protocols ratatui-image detects (Kitty,
//! Sixel, iTerm2) with a Unicode half-block fallback.

mod loader;

pub use loader::ImageCache;

#[cfg(unix)]
use std::time::Duration;

use image::DynamicImage;
use ratatui_image::picker::Picker;
#[cfg(unix)]
use ratatui_image::picker::cap_parser::QueryStdioOptions;

#[cfg(unix)]
const PICKER_QUERY_TIMEOUT_MS: u64 = 250;

/// Create a picker for terminal image rendering.
///
/// The picker detects terminal capabilities and chooses the best protocol.
pub fn create_picker(force_half_cell: bool) -> Option<Picker> {
    if force_half_cell {
        tracing::debug!("forcing half-block image rendering");
        return Some(Picker::halfblocks());
    }

    // The stdio capability query can leave a reader thread on the Windows
    // console input buffer; use half-blocks there.
    #[cfg(not(unix))]
    {
        return Some(Picker::halfblocks());
    }

    #[cfg(unix)]
    {
        let picker = Picker::from_query_stdio_with_options(query_options()).ok()?;
        tracing::debug!(protocol = ?picker.protocol_type(), "image picker ready");
        Some(picker)
    }
}

/// Decode downloaded image bytes.
///
/// # Errors
///
/// Returns the decoder error for unknown or corrupt formats.
pub fn decode_image(bytes: &[u8]) -> image::ImageResult<DynamicImage> {
    image::load_from_memory(bytes)
}

#[cfg(unix)]
fn query_options() -> QueryStdioOptions {
    let mut options = QueryStdioOptions::default();
    options.timeout = Duration::from_millis(PICKER_QUERY_TIMEOUT_MS);
    options
}
