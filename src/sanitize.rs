//! File name sanitization for renames.

use std::path::Path;

/// Characters that are not valid in a file name on at least one supported platform.
const ILLEGAL_CHARS: [char; 7] = [':', '"', '*', '?', '<', '>', '|'];

/// Cleans a proposed file name.
///
/// - Trims surrounding whitespace.
/// - Rejects names carrying a directory component (`/` or `\`); a rename never leaves its directory.
/// - Strips illegal characters (`:`, `"`, `*`, `?`, `<`, `>`, `|`) and control characters.
/// - Strips trailing dots and spaces, which Windows silently drops.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize(name: &str) -> Option<String> {
    let trimmed = name.trim();

    if trimmed.contains(['/', '\\']) {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();
    let cleaned = cleaned.trim().trim_end_matches(['.', ' ']);

    if cleaned.is_empty() {
        return None;
    }

    Some(cleaned.to_owned())
}

/// Returns `true` if `name` does not end in one of `extensions` (compared case-insensitively, without the dot).
pub fn has_no_recognized_extension(name: &str, extensions: &[String]) -> bool {
    match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => !extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)),
        None => true,
    }
}
