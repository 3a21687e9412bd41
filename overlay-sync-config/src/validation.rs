//! CSS value validation for overlay style fields.
//!
//! The overlay renderer accepts arbitrary CSS, but a malformed size or color
//! silently breaks the overlay in the browser source. Values are checked here
//! before they ever reach the network.

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// CSS color keywords accepted by the overlay (compared case-insensitively).
pub const NAMED_COLORS: &[&str] = &[
    "white",
    "black",
    "red",
    "green",
    "blue",
    "yellow",
    "cyan",
    "magenta",
    "orange",
    "purple",
    "pink",
    "brown",
    "gray",
    "grey",
    "transparent",
];

/// Font weight keywords; numeric weights are handled separately.
pub const WEIGHT_KEYWORDS: &[&str] = &["normal", "bold", "lighter", "bolder"];

static FONT_SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+)?(px|em|rem|%|pt)$")
        .expect("font size regex is a compile-time constant and must be valid")
});

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+)?(s|ms)$")
        .expect("duration regex is a compile-time constant and must be valid")
});

static HEX_COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$")
        .expect("hex color regex is a compile-time constant and must be valid")
});

static RGB_COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*\)$")
        .expect("rgb() regex is a compile-time constant and must be valid")
});

static RGBA_COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^rgba\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*,\s*[0-9.]+\s*\)$",
    )
    .expect("rgba() regex is a compile-time constant and must be valid")
});

/// Validate a CSS font size such as `64px`, `2.5em` or `100%`.
pub fn validate_font_size(size: &str) -> Result<(), ValidationError> {
    if FONT_SIZE_PATTERN.is_match(size) {
        Ok(())
    } else {
        Err(ValidationError::FontSize(size.to_string()))
    }
}

/// Validate a CSS font weight: a keyword or one of `100`, `200`, ... `900`.
pub fn validate_font_weight(weight: &str) -> Result<(), ValidationError> {
    if WEIGHT_KEYWORDS.contains(&weight) || is_numeric_weight(weight) {
        Ok(())
    } else {
        Err(ValidationError::FontWeight(weight.to_string()))
    }
}

fn is_numeric_weight(weight: &str) -> bool {
    // Exact textual match only: "0400" or "400.0" are not weights.
    (1..=9).any(|n| weight == (n * 100).to_string())
}

/// Validate a CSS transition duration such as `1s` or `500ms`.
pub fn validate_duration(duration: &str) -> Result<(), ValidationError> {
    if DURATION_PATTERN.is_match(duration) {
        Ok(())
    } else {
        Err(ValidationError::Duration(duration.to_string()))
    }
}

/// Validate the color assigned to `field`.
pub fn validate_color(field: &str, value: &str) -> Result<(), ValidationError> {
    if is_valid_color(value) {
        Ok(())
    } else {
        Err(ValidationError::Color {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Whether `color` is a CSS color the overlay understands.
///
/// Accepts the keywords in [`NAMED_COLORS`], `#RGB`, `#RRGGBB`, `#RRGGBBAA`,
/// `rgb(r, g, b)` and `rgba(r, g, b, a)`. Channel values above 255 are
/// rejected; the alpha component is only checked for presence.
pub fn is_valid_color(color: &str) -> bool {
    let color = color.trim();
    if color.is_empty() {
        return false;
    }

    let lowered = color.to_ascii_lowercase();
    if NAMED_COLORS.contains(&lowered.as_str()) {
        return true;
    }

    if HEX_COLOR_PATTERN.is_match(color) {
        return true;
    }

    let captures = RGB_COLOR_PATTERN
        .captures(color)
        .or_else(|| RGBA_COLOR_PATTERN.captures(color));

    match captures {
        Some(caps) => (1..=3).all(|i| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u16>().ok())
                .is_some_and(|channel| channel <= 255)
        }),
        None => false,
    }
}
