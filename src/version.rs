//! Version folder naming
//!
//! Version folders are named by a positive integer (`3`), transformation
//! folders by the pair of versions they connect (`3-2`).

use std::sync::LazyLock;

use regex::Regex;

// Constant patterns, covered by the tests below; compiling them cannot fail.
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]*$").expect("valid version regex"));

static TRANSFORMATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([1-9][0-9]*)-([1-9][0-9]*)$").expect("valid transformation regex")
});

/// Parse a version folder name.
///
/// Leading zeros are rejected so two folders can never map to the same number.
pub fn parse_version(name: &str) -> Option<u32> {
    if !VERSION_PATTERN.is_match(name) {
        return None;
    }
    name.parse().ok()
}

/// Parse a transformation folder name into `(from, to)`
pub fn parse_transformation(name: &str) -> Option<(u32, u32)> {
    let captures = TRANSFORMATION_PATTERN.captures(name)?;
    let from: u32 = captures.get(1)?.as_str().parse().ok()?;
    let to: u32 = captures.get(2)?.as_str().parse().ok()?;
    if from == to {
        return None;
    }
    Some((from, to))
}

/// Folder name for a transformation between two versions
pub fn transformation_dir_name(from: u32, to: u32) -> String {
    format!("{}-{}", from, to)
}
