//! URL encoding of project names for `/project/<name>` detail links.
//!
//! Project names are free text with spaces, ampersands, and the occasional
//! slash, so links must percent-encode them and the detail route must decode
//! before lookup.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Everything outside the URL path-segment safe set gets encoded. Notably a
/// space becomes `%20` and `/` is encoded so a name cannot span segments.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b'&')
    .add(b'+');

/// Percent-encodes a project name for use as a single URL path segment.
pub fn encode(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT).to_string()
}

/// Decodes a percent-encoded path segment back into a project name.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; a garbled name
/// simply fails the subsequent lookup.
pub fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
