//! Lenient version parsing for release tags.
//!
//! Release tags are not always full semver: `v2.3`, `2`, `2.3.0` and
//! `v2.3.0-beta.1` all occur. Missing components are treated as 0.

use semver::Version;
use std::cmp::Ordering;

/// Parse a release tag or version string.
pub fn parse_lenient(raw: &str) -> Result<Version, String> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    if let Ok(version) = Version::parse(stripped) {
        return Ok(version);
    }

    // Pad short versions ("2.3" -> "2.3.0") and retry, keeping any suffix.
    let split_at = stripped.find(['-', '+']).unwrap_or(stripped.len());
    let (core, suffix) = stripped.split_at(split_at);
    let parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(format!("Unrecognised version '{}'", raw));
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("Unrecognised version '{}'", raw))?;
    }

    let padded = format!("{}.{}.{}{}", numbers[0], numbers[1], numbers[2], suffix);
    Version::parse(&padded).map_err(|e| format!("Unrecognised version '{}': {}", raw, e))
}

/// Compare two version strings component-wise.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, String> {
    Ok(parse_lenient(a)?.cmp(&parse_lenient(b)?))
}
