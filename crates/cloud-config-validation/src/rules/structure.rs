use crate::path::InstancePath;
use crate::report::Report;
use crate::schema::{CLOUD_CONFIG, Schema};
use crate::walk::{SchemaVisitor, WalkContext};
use cloud_config_yaml::{MappingEntry, Node};

/// Check the document's shape against the cloud-config schema.
///
/// Unknown keys and values of the wrong kind are warnings: the loader
/// ignores both, so the document still applies, just not as written.
pub fn check_structure(root: &Node, report: &mut Report) {
    let mut checker = StructureChecker { report };
    WalkContext::new(&mut checker).walk(root, root.line, &CLOUD_CONFIG);
}

struct StructureChecker<'r> {
    report: &'r mut Report,
}

impl SchemaVisitor for StructureChecker<'_> {
    fn visit(&mut self, node: &Node, line: usize, schema: &Schema, path: &InstancePath) {
        if !schema.accepts(node) {
            tracing::trace!(%path, found = node.kind_name(), "type mismatch");
            self.report.warning(
                line,
                format!(
                    "incorrect type for \"{}\" (want {})",
                    path,
                    schema.human_type()
                ),
            );
        }
    }

    fn unknown_key(&mut self, entry: &MappingEntry, name: &str) {
        self.report
            .warning(entry.line(), format!("unrecognized key \"{}\"", name));
    }
}
