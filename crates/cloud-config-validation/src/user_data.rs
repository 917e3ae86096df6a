//! Classification of raw user data.
//!
//! User data handed to a host is one of a few formats, told apart by its
//! first bytes. Only cloud-config documents go through validation.

use serde_json::Value;

/// Header that marks a cloud-config document.
pub const CLOUD_CONFIG_HEADER: &str = "#cloud-config";

/// What a user-data payload is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDataKind {
    /// Nothing but whitespace.
    Empty,
    /// An executable script (`#!` shebang).
    Script,
    /// An Ignition config (JSON object with an `ignition` section).
    Ignition,
    /// A cloud-config document.
    CloudConfig,
    /// None of the above.
    Unknown,
}

/// Classify raw user data by its header.
///
/// # Example
///
/// ```rust
/// use cloud_config_validation::{UserDataKind, classify};
///
/// assert_eq!(classify(b"#cloud-config\nhostname: a\n"), UserDataKind::CloudConfig);
/// assert_eq!(classify(b"#!/bin/sh\necho hi\n"), UserDataKind::Script);
/// assert_eq!(classify(b"hostname: a\n"), UserDataKind::Unknown);
/// ```
pub fn classify(data: &[u8]) -> UserDataKind {
    if data.trim_ascii().is_empty() {
        UserDataKind::Empty
    } else if data.starts_with(b"#!") {
        UserDataKind::Script
    } else if first_line(data).trim_ascii_end() == CLOUD_CONFIG_HEADER.as_bytes() {
        UserDataKind::CloudConfig
    } else if is_ignition(data) {
        UserDataKind::Ignition
    } else {
        UserDataKind::Unknown
    }
}

fn first_line(data: &[u8]) -> &[u8] {
    data.split(|b| *b == b'\n').next().unwrap_or_default()
}

fn is_ignition(data: &[u8]) -> bool {
    match serde_json::from_slice::<Value>(data) {
        Ok(Value::Object(config)) => {
            config.contains_key("ignition") || config.contains_key("ignitionVersion")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(classify(b""), UserDataKind::Empty);
        assert_eq!(classify(b" \n\t\n"), UserDataKind::Empty);
    }

    #[test]
    fn test_cloud_config_header() {
        assert_eq!(classify(b"#cloud-config"), UserDataKind::CloudConfig);
        assert_eq!(classify(b"#cloud-config \r\nhostname: a"), UserDataKind::CloudConfig);
        assert_eq!(classify(b"#cloud-configs\n"), UserDataKind::Unknown);
        assert_eq!(classify(b"\n#cloud-config\n"), UserDataKind::Unknown);
    }

    #[test]
    fn test_script() {
        assert_eq!(classify(b"#!/bin/bash\nexit 0"), UserDataKind::Script);
    }

    #[test]
    fn test_ignition() {
        assert_eq!(
            classify(br#"{"ignition": {"version": "2.0.0"}}"#),
            UserDataKind::Ignition
        );
        assert_eq!(classify(br#"{"ignitionVersion": 1}"#), UserDataKind::Ignition);
        assert_eq!(classify(br#"{"hostname": "a"}"#), UserDataKind::Unknown);
        assert_eq!(classify(b"[1, 2]"), UserDataKind::Unknown);
    }
}
