//! Error codes and hint suggestions for cloud-config findings.

use cloud_config_validation::Entry;

/// Infer an error code from a finding.
///
/// Maps message patterns to CC-1-xxx codes. Parse failures carry scanner
/// messages and fall through to the generic code.
pub fn infer_error_code(entry: &Entry) -> &'static str {
    let msg = &entry.message;

    // Unknown key in a struct
    if msg.starts_with("unrecognized key") {
        return "CC-1-10";
    }

    // Type mismatches
    if msg.starts_with("incorrect type for") {
        return "CC-1-11";
    }

    // Pattern mismatch
    if msg.starts_with("invalid value") {
        return "CC-1-12";
    }

    if msg.starts_with("content cannot be decoded as") {
        return "CC-1-13";
    }

    if msg == "discovery URL is not valid" {
        return "CC-1-14";
    }

    // write_files placement
    if msg.ends_with("read-only filesystem") || msg.ends_with("is not absolute") {
        return "CC-1-15";
    }

    if msg.ends_with("doesn't belong under coreos") {
        return "CC-1-16";
    }

    // User-data header
    if msg.starts_with("must be \"#cloud-config\"") {
        return "CC-1-17";
    }

    "CC-1-99"
}

/// Suggest a fix for a finding based on its message.
///
/// Returns a hint (ending with ?) or None if no specific hint applies.
pub fn suggest_fix(entry: &Entry) -> Option<String> {
    let msg = &entry.message;

    if msg.starts_with("unrecognized key") {
        return Some("Check for typos in key names or remove unrecognized keys?".to_string());
    }

    if msg.starts_with("incorrect type for") {
        let want = msg
            .rsplit_once("(want ")
            .and_then(|(_, rest)| rest.strip_suffix(')'));
        let hint = match want {
            Some("bool") => "Use `true` or `false`?",
            Some("int" | "float64") => "Use a numeric value without quotes?",
            Some("string") => "Use a single value instead of a list or mapping?",
            Some("struct") => "Use YAML mapping syntax with key-value pairs?",
            Some(list) if list.starts_with("[]") => "Use a YAML list with one `- item` per line?",
            _ => return None,
        };
        return Some(hint.to_string());
    }

    if msg.starts_with("invalid value") {
        return Some("Check the allowed values for this key?".to_string());
    }

    if msg.starts_with("content cannot be decoded as") {
        return Some(
            "Check that `content` is encoded the way `encoding` declares (base64, gzip or gzip+base64)?"
                .to_string(),
        );
    }

    if msg == "discovery URL is not valid" {
        return Some("Use a full URL such as `https://discovery.etcd.io/<token>`?".to_string());
    }

    if msg.ends_with("read-only filesystem") {
        return Some("Write the file outside of /usr?".to_string());
    }

    if msg.ends_with("is not absolute") {
        return Some("Use an absolute path starting with `/`?".to_string());
    }

    if msg.ends_with("doesn't belong under coreos") {
        return Some("Move `write_files` to the top level of the document?".to_string());
    }

    if msg.starts_with("must be \"#cloud-config\"") {
        return Some("Start the document with a `#cloud-config` line?".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_config_validation::Severity;

    fn make_entry(message: &str) -> Entry {
        Entry::new(Severity::Warning, message, 1)
    }

    #[test]
    fn test_infer_unrecognized_key() {
        let entry = make_entry("unrecognized key \"bogus\"");
        assert_eq!(infer_error_code(&entry), "CC-1-10");
    }

    #[test]
    fn test_infer_type_mismatch() {
        let entry = make_entry("incorrect type for \"users[0]\" (want struct)");
        assert_eq!(infer_error_code(&entry), "CC-1-11");
    }

    #[test]
    fn test_infer_write_files() {
        assert_eq!(
            infer_error_code(&make_entry("file cannot be written to a read-only filesystem")),
            "CC-1-15"
        );
        assert_eq!(
            infer_error_code(&make_entry("file path \"a\" is not absolute")),
            "CC-1-15"
        );
    }

    #[test]
    fn test_infer_generic() {
        let entry = make_entry("could not find expected ':'");
        assert_eq!(infer_error_code(&entry), "CC-1-99");
    }

    #[test]
    fn test_suggest_by_wanted_type() {
        let hint = |msg: &str| suggest_fix(&make_entry(msg)).unwrap();
        assert!(hint("incorrect type for \"coreos.fleet.verify_units\" (want bool)").contains("true"));
        assert!(hint("incorrect type for \"ssh_authorized_keys\" (want []string)").contains("list"));
        assert!(hint("incorrect type for \"coreos\" (want struct)").contains("mapping"));
        assert!(hint("incorrect type for \"coreos.etcd2.election_timeout\" (want int)").contains("numeric"));
    }

    #[test]
    fn test_suggest_header() {
        let hint = suggest_fix(&make_entry("must be \"#cloud-config\" or begin with \"#!\""));
        assert!(hint.unwrap().contains("#cloud-config"));
    }

    #[test]
    fn test_suggest_none() {
        let entry = make_entry("could not find expected ':'");
        assert!(suggest_fix(&entry).is_none());
    }
}
