use super::write_file_entries;
use crate::content::decode_content;
use crate::report::Report;
use crate::schema::child;
use cloud_config_yaml::{Node, NodeKind};

/// Check that every write_files content decodes under its declared encoding.
pub fn check_encoding(root: &Node, report: &mut Report) {
    for file in write_file_entries(root) {
        let Some(encoding) = child(file, "encoding").and_then(|e| e.value.as_str()) else {
            continue;
        };

        let content = child(file, "content");
        let (bytes, line) = match content {
            None => (b"".as_slice(), file.line),
            Some(entry) => match &entry.value.kind {
                NodeKind::Null => (b"".as_slice(), entry.line()),
                NodeKind::Scalar(scalar) => (scalar.bytes(), entry.line()),
                // the structure check reports collections in a string slot
                _ => continue,
            },
        };

        if let Err(err) = decode_content(bytes, encoding) {
            tracing::trace!(encoding, %err, "content does not decode");
            report.error(line, format!("content cannot be decoded as {:?}", encoding));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity::Error;
    use crate::rules::test_support::{entry, run};

    fn check(config: &str) -> Vec<crate::Entry> {
        run(check_encoding, config)
    }

    #[test]
    fn test_decodable_content() {
        for ok in [
            "",
            "write_files:\n  - encoding: base64\n    content: aGVsbG8K",
            "write_files:\n  - content: !!binary aGVsbG8K",
            "write_files:\n  - encoding: base64\n    content: !!binary YUdWc2JHOEsK",
            "write_files:\n  - encoding: gzip\n    content: !!binary H4sIAOC3tVQAA8tIzcnJ5wIAIDA6NgYAAAA=",
            "write_files:\n  - encoding: gzip+base64\n    content: H4sIAOC3tVQAA8tIzcnJ5wIAIDA6NgYAAAA=",
            "write_files:\n  - encoding: b64\n    content: |\n      aGVs\n      bG8K",
            "write_files:\n  - encoding: base64",
            "write_files:\n  - encoding:\n    content: not encoded",
        ] {
            assert!(check(ok).is_empty(), "{:?}", ok);
        }
    }

    #[test]
    fn test_binary_content_is_decoded_first() {
        // !!binary aGVsbG8K is "hello\n", which is not base64 itself
        assert_eq!(
            check("write_files:\n  - encoding: base64\n    content: !!binary aGVsbG8K"),
            vec![entry(Error, "content cannot be decoded as \"base64\"", 3)]
        );
    }

    #[test]
    fn test_unknown_encoding() {
        assert_eq!(
            check("write_files:\n  - encoding: custom\n    content: hello"),
            vec![entry(Error, "content cannot be decoded as \"custom\"", 3)]
        );
    }

    #[test]
    fn test_missing_content_is_reported_on_the_element() {
        assert_eq!(
            check("write_files:\n  - path: /a\n  - encoding: gzip"),
            vec![entry(Error, "content cannot be decoded as \"gzip\"", 3)]
        );
    }

    #[test]
    fn test_each_file_is_checked() {
        assert_eq!(
            check(
                "write_files:\n  - encoding: gz\n    content: plain\n  - encoding: base64\n    content: aGVsbG8K\n  - encoding: base64\n    content: '%%%'"
            ),
            vec![
                entry(Error, "content cannot be decoded as \"gz\"", 3),
                entry(Error, "content cannot be decoded as \"base64\"", 7),
            ]
        );
    }

    #[test]
    fn test_hyphenated_write_files() {
        assert_eq!(
            check("write-files:\n  - encoding: base64\n    content: '!'"),
            vec![entry(Error, "content cannot be decoded as \"base64\"", 3)]
        );
    }
}
