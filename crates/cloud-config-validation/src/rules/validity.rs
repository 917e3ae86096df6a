use crate::path::InstancePath;
use crate::report::Report;
use crate::schema::{CLOUD_CONFIG, Schema};
use crate::walk::{SchemaVisitor, WalkContext};
use cloud_config_yaml::Node;

/// Check scalar values against the patterns their slots declare.
///
/// Only recognized keys are visited; unknown keys are the structure
/// check's concern.
pub fn check_validity(root: &Node, report: &mut Report) {
    let mut checker = ValidityChecker { report };
    WalkContext::new(&mut checker).walk(root, root.line, &CLOUD_CONFIG);
}

struct ValidityChecker<'r> {
    report: &'r mut Report,
}

impl SchemaVisitor for ValidityChecker<'_> {
    fn visit(&mut self, node: &Node, line: usize, schema: &Schema, _path: &InstancePath) {
        let (Some(pattern), Some(text)) = (schema.pattern(), node.as_str()) else {
            return;
        };
        if !text.is_empty() && !pattern.is_match(text) {
            self.report.error(line, format!("invalid value {}", text));
        }
    }
}
