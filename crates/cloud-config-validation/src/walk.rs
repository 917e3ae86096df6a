// Schema-directed traversal shared by the structure and validity checks

use crate::path::InstancePath;
use crate::schema::{Schema, normalize_key};
use cloud_config_yaml::{MappingEntry, Node, NodeKind};

/// Callbacks for [`walk`].
pub(crate) trait SchemaVisitor {
    /// Called for every node that sits in a slot described by `schema`.
    ///
    /// `line` is where the slot is reported: the key's line for a mapping
    /// value, the element's own line for a sequence element.
    fn visit(&mut self, node: &Node, line: usize, schema: &Schema, path: &InstancePath);

    /// Called for a mapping key the struct schema does not know.
    fn unknown_key(&mut self, _entry: &MappingEntry, _name: &str) {}
}

/// Validation context tracks the instance path during traversal.
pub(crate) struct WalkContext<'v, V> {
    visitor: &'v mut V,
    path: InstancePath,
}

impl<'v, V: SchemaVisitor> WalkContext<'v, V> {
    pub(crate) fn new(visitor: &'v mut V) -> Self {
        Self {
            visitor,
            path: InstancePath::new(),
        }
    }

    /// Walk `node` against `schema` depth-first, in document order.
    ///
    /// Descends only where the node's shape matches the schema; a mismatch
    /// is the visitor's to report.
    pub(crate) fn walk(&mut self, node: &Node, line: usize, schema: &Schema) {
        self.visitor.visit(node, line, schema, &self.path);

        match (schema, &node.kind) {
            (Schema::Struct(fields), NodeKind::Mapping(entries)) => {
                for entry in entries {
                    let key = entry.key_name();
                    let name = normalize_key(&key);
                    match fields.get(&name) {
                        Some(child) => {
                            self.path.push_key(name.as_ref());
                            self.walk(&entry.value, entry.line(), child);
                            self.path.pop();
                        }
                        None => self.visitor.unknown_key(entry, &name),
                    }
                }
            }
            (Schema::List(item), NodeKind::Sequence(items)) => {
                for (index, element) in items.iter().enumerate() {
                    self.path.push_index(index);
                    self.walk(element, element.line, item);
                    self.path.pop();
                }
            }
            _ => {}
        }
    }
}
