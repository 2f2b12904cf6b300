//! HTML escaping for interpolated text.

/// Escapes text for safe interpolation into HTML element content or
/// double-quoted attribute values.
pub fn html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
