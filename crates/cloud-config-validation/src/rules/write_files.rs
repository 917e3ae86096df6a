use super::write_file_entries;
use crate::report::Report;
use crate::schema::child;
use cloud_config_yaml::Node;

/// Check where write_files entries would land on the host.
pub fn check_write_files(root: &Node, report: &mut Report) {
    for file in write_file_entries(root) {
        let Some(entry) = child(file, "path") else {
            continue;
        };
        let Some(path) = entry.value.as_str().filter(|path| !path.is_empty()) else {
            continue;
        };

        let cleaned = clean_path(path);
        if !cleaned.starts_with('/') {
            report.warning(entry.line(), format!("file path {:?} is not absolute", path));
        } else if is_read_only(parent_dir(&cleaned)) {
            report.error(entry.line(), "file cannot be written to a read-only filesystem");
        }
    }
}

/// Flag a write_files list nested under `coreos`, where it has no effect.
pub fn check_write_files_under_coreos(root: &Node, report: &mut Report) {
    if let Some(entry) = child(root, "coreos").and_then(|c| child(&c.value, "write_files")) {
        report.info(entry.line(), "write_files doesn't belong under coreos");
    }
}

/// `/usr` is mounted read-only.
fn is_read_only(dir: &str) -> bool {
    dir == "/usr" || dir.starts_with("/usr/")
}

/// Lexically clean a slash-separated path: collapse repeated slashes and
/// resolve `.` and `..` without touching the filesystem.
fn clean_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` above the root stays at the root
                _ if absolute => {}
                _ => parts.push(".."),
            },
            part => parts.push(part),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Directory part of a cleaned path.
fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity::{Error, Info, Warning};
    use crate::rules::test_support::{entry, run};

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/valid"), "/valid");
        assert_eq!(clean_path("//usr//share/./x"), "/usr/share/x");
        assert_eq!(clean_path("/usr/../etc/hosts"), "/etc/hosts");
        assert_eq!(clean_path("/../../usr/x"), "/usr/x");
        assert_eq!(clean_path("a/b/../../.."), "..");
        assert_eq!(clean_path("./"), ".");
        assert_eq!(clean_path("/"), "/");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/usr/share/x"), "/usr/share");
        assert_eq!(parent_dir("/usr"), "/");
        assert_eq!(parent_dir("x"), ".");
    }

    #[test]
    fn test_writable_paths() {
        for ok in [
            "",
            "write_files:\n  - path: /valid",
            "write_files:\n  - path: /tmp/usr/valid",
            "write_files:\n  - path: /usr",
            "write_files:\n  - path: /usrlocal/file",
            "write_files:\n  - path: /usr/../etc/hosts",
            "write_files:\n  - content: no path",
            "write_files:\n  - path:",
        ] {
            assert!(run(check_write_files, ok).is_empty(), "{:?}", ok);
        }
    }

    #[test]
    fn test_read_only_paths() {
        for bad in [
            "write_files:\n  - path: /usr/bin/tool",
            "write_files:\n  - path: //usr//share/./motd",
            "write_files:\n  - path: /etc/../usr/lib/x",
        ] {
            assert_eq!(
                run(check_write_files, bad),
                vec![entry(Error, "file cannot be written to a read-only filesystem", 2)],
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            run(check_write_files, "write_files:\n  - owner: root\n    path: etc/motd"),
            vec![entry(Warning, "file path \"etc/motd\" is not absolute", 3)]
        );
    }

    #[test]
    fn test_write_files_under_coreos() {
        assert!(run(check_write_files_under_coreos, "").is_empty());
        assert!(run(check_write_files_under_coreos, "write_files:\n  - path: /hi").is_empty());
        assert_eq!(
            run(check_write_files_under_coreos, "coreos:\n  write_files:\n    - path: /hi"),
            vec![entry(Info, "write_files doesn't belong under coreos", 2)]
        );
        assert_eq!(
            run(check_write_files_under_coreos, "coreos:\n  write-files:\n    - path: /hyphen"),
            vec![entry(Info, "write_files doesn't belong under coreos", 2)]
        );
    }
}
