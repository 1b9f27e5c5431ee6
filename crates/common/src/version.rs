//! Dotted product-version comparison
//!
//! Documentation version histories use dotted numeric versions
//! ("0.0.0", "2.7.0", "4.3.0-beta.1"). Segments are compared numerically
//! where possible, falling back to string order for non-numeric tails.
//! A trailing pre-release tail sorts before the bare release, so
//! "4.3.0-rc.1" is older than "4.3.0".

use std::cmp::Ordering;

/// Compare two dotted version strings
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts = split_version(a);
    let b_parts = split_version(b);

    for i in 0..a_parts.len().max(b_parts.len()) {
        let av = a_parts.get(i);
        let bv = b_parts.get(i);
        let ord = match (av, bv) {
            (Some(x), Some(y)) => compare_segment(x, y),
            // A numeric tail extends the release ("4.3" < "4.3.0"); a
            // non-numeric tail is a pre-release and sorts before it
            // ("4.3.0-beta.1" < "4.3.0").
            (Some(x), None) => tail_ordering(x),
            (None, Some(y)) => tail_ordering(y).reverse(),
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// True when `version` is strictly newer than `baseline`
pub fn is_newer_than(version: &str, baseline: &str) -> bool {
    compare_versions(version, baseline) == Ordering::Greater
}

fn split_version(v: &str) -> Vec<&str> {
    v.trim().split(['.', '-']).filter(|s| !s.is_empty()).collect()
}

fn tail_ordering(first_extra: &str) -> Ordering {
    if first_extra.parse::<u64>().is_ok() {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        // a pre-release word sorts below a numeric segment ("beta" < "0")
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ordering() {
        assert_eq!(compare_versions("4.3.0", "4.3.0"), Ordering::Equal);
        assert_eq!(compare_versions("4.10.0", "4.9.0"), Ordering::Greater);
        assert_eq!(compare_versions("0.0.0", "4.3.0"), Ordering::Less);
    }

    #[test]
    fn test_is_newer_than_baseline() {
        assert!(is_newer_than("4.4.0", "4.3.0"));
        assert!(!is_newer_than("4.3.0", "4.3.0"));
        assert!(!is_newer_than("2.7.0", "4.3.0"));
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(compare_versions("4.3", "4.3.0"), Ordering::Less);
        assert_eq!(compare_versions("4.3.1", "4.3"), Ordering::Greater);
    }

    #[test]
    fn test_prerelease_older_than_release() {
        assert_eq!(compare_versions("4.3.0-beta.1", "4.3.0"), Ordering::Less);
        assert_eq!(compare_versions("4.3.0", "4.3.0-rc.1"), Ordering::Greater);
        assert!(!is_newer_than("4.3.0-rc.1", "4.3.0"));
        assert!(is_newer_than("4.4.0-beta.1", "4.3.0"));
    }
}
