//! External collaborator inputs: rate-limit header table and license
//! classification. Both degrade to built-in defaults with a warning when
//! the file is missing or unreadable.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Known license identifiers, matched against the first line of the
/// license file
const KNOWN_LICENSES: &[(&str, &str)] = &[
    ("GNU AFFERO", "AGPL-3.0"),
    ("AGPL", "AGPL-3.0"),
    ("GNU GENERAL PUBLIC LICENSE", "GPL-3.0"),
    ("MIT", "MIT"),
    ("APACHE", "Apache-2.0"),
    ("MOZILLA", "MPL-2.0"),
];

/// Rate-limit headers attached to every 2xx response
pub fn load_rate_limit_headers(
    path: Option<&Path>,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, String> {
    let Some(path) = path else {
        return default_rate_limit_headers();
    };
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(table) => table,
            Err(e) => {
                warnings.push(format!(
                    "Rate-limit table {:?} is malformed ({}), using built-in headers",
                    path, e
                ));
                default_rate_limit_headers()
            }
        },
        Err(_) => {
            warnings.push(format!(
                "Rate-limit table {:?} not found, using built-in headers",
                path
            ));
            default_rate_limit_headers()
        }
    }
}

fn default_rate_limit_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "X-RateLimit-Limit".to_string(),
            "Number of requests permitted per time period".to_string(),
        ),
        (
            "X-RateLimit-Remaining".to_string(),
            "Number of requests you can still make".to_string(),
        ),
        (
            "X-RateLimit-Reset".to_string(),
            "Timestamp when your rate limit will reset".to_string(),
        ),
    ])
}

/// Classify the license file's first line into a known identifier,
/// falling back to `fallback` with a warning
pub fn classify_license(
    path: Option<&Path>,
    fallback: &str,
    warnings: &mut Vec<String>,
) -> String {
    let Some(path) = path else {
        return fallback.to_string();
    };
    let first_line = match fs::read_to_string(path) {
        Ok(content) => content.lines().next().unwrap_or("").to_uppercase(),
        Err(_) => {
            warnings.push(format!(
                "License file {:?} not found, using {}",
                path, fallback
            ));
            return fallback.to_string();
        }
    };

    for (marker, identifier) in KNOWN_LICENSES {
        if first_line.contains(marker) {
            return identifier.to_string();
        }
    }
    warnings.push(format!(
        "License file {:?} first line not recognized, using UNKNOWN",
        path
    ));
    "UNKNOWN".to_string()
}
