//! Stored image reference normalization.
//!
//! Stored values arrive in three shapes: absolute URLs, relative paths
//! written by the upload collaborator, and (historically) inline base64
//! data URLs. Rendering needs a single absolute form; data URLs are
//! materialized to stored paths at upload time, so encountering one at
//! render time resolves to nothing rather than re-encoding.

/// Path prefix written by the upload collaborator for locally stored files.
pub const UPLOAD_PREFIX: &str = "/uploads/";

/// Normalize a stored image reference into an absolute URL.
///
/// - absolute `http(s)` URLs pass through unchanged (idempotent)
/// - upload paths get `base_url` prepended
/// - `data:` URLs resolve to `None`
/// - anything else passes through unchanged
/// - absent or empty input yields `None`
pub fn resolve_image_url(base_url: &str, value: Option<&str>) -> Option<String> {
    let value = value?;
    if value.is_empty() {
        return None;
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    if value.starts_with(UPLOAD_PREFIX) {
        return Some(format!("{}{}", base_url.trim_end_matches('/'), value));
    }
    if value.starts_with("data:") {
        return None;
    }
    Some(value.to_string())
}
