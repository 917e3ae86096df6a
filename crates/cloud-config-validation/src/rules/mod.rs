//! Independent checks over a parsed cloud-config document.
//!
//! Every rule has the same shape: it reads the tree and appends to the
//! report. Rules never fail and never see each other's findings, so a new
//! rule only needs a function and a line in [`RULES`].

mod discovery;
mod encoding;
mod structure;
mod validity;
mod write_files;

pub use discovery::check_discovery_url;
pub use encoding::check_encoding;
pub use structure::check_structure;
pub use validity::check_validity;
pub use write_files::{check_write_files, check_write_files_under_coreos};

use crate::Report;
use cloud_config_yaml::Node;

/// A rule check.
pub type Rule = fn(&Node, &mut Report);

/// Every rule, in the order the pipeline runs them.
pub const RULES: &[(&str, Rule)] = &[
    ("discovery_url", check_discovery_url),
    ("encoding", check_encoding),
    ("structure", check_structure),
    ("validity", check_validity),
    ("write_files", check_write_files),
    ("write_files_under_coreos", check_write_files_under_coreos),
];

/// Run every rule against `root`, appending to `report` in rule order.
pub fn run_rules(root: &Node, report: &mut Report) {
    for &(name, rule) in RULES {
        let before = report.len();
        rule(root, report);
        tracing::debug!(rule = name, entries = report.len() - before, "ran rule");
    }
}

/// Elements of the top-level `write_files` sequence that are mappings.
pub(crate) fn write_file_entries(root: &Node) -> impl Iterator<Item = &Node> {
    crate::schema::child(root, "write_files")
        .and_then(|entry| entry.value.as_sequence())
        .unwrap_or_default()
        .iter()
        .filter(|file| file.is_mapping())
}
