//! Version normalization and comparison
//!
//! Equality is strict: two versions are equal only if they name the same
//! release once spelling differences are removed (`1.0` vs `1.0.0`,
//! `2.0.0-rc1` vs `2.0.0rc1`, `V1.2` vs `1.2`, `1.0-1` vs `1.0.post1`).
//! Range satisfaction is never considered.

use std::cmp::Ordering;

/// Normalize a version string for strict equality checks
pub fn normalize_version(version: &str) -> String {
    let lowered = version.trim().to_lowercase();
    let v = lowered.strip_prefix('v').unwrap_or(lowered.as_str());

    let release_end = v
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(v.len());
    let (release, suffix) = v.split_at(release_end);

    let mut segments: Vec<u64> = release
        .split('.')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    while segments.len() > 1 && segments.last() == Some(&0) {
        segments.pop();
    }

    let release = segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".");
    let suffix = suffix.trim_start_matches(['.', '-', '_']);

    // `1.0-1` is the implicit post-release spelling of `1.0.post1`
    if suffix.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("{}.post{}", release, suffix);
    }
    if suffix.starts_with("post") || suffix.starts_with("dev") {
        return format!("{}.{}", release, suffix);
    }
    format!("{}{}", release, suffix)
}

/// Returns true if both strings name the same release
pub fn versions_equal(a: &str, b: &str) -> bool {
    normalize_version(a) == normalize_version(b)
}

/// Compare two version strings by their numeric parts
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse_parts = |s: &str| -> Vec<u64> {
        let s = s.trim();
        let s = s.strip_prefix('v').unwrap_or(s);
        s.split(['.', '-']).filter_map(|p| p.parse().ok()).collect()
    };

    let parts_a = parse_parts(a);
    let parts_b = parse_parts(b);

    for (pa, pb) in parts_a.iter().zip(parts_b.iter()) {
        match pa.cmp(pb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    parts_a.len().cmp(&parts_b.len())
}

/// Returns true if `pinned` is an older release than `latest`
pub fn is_older(pinned: &str, latest: &str) -> bool {
    !versions_equal(pinned, latest) && compare_versions(pinned, latest) == Ordering::Less
}
