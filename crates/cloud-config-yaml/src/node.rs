//! YAML nodes with source line tracking.

use std::borrow::Cow;
use yaml_rust2::Yaml;

/// A YAML node annotated with the position where it begins.
///
/// The tree is owned and immutable once parsed. Every node reachable from
/// the root starts on a line at or after its parent's line.
///
/// ## Example
///
/// ```rust
/// use cloud_config_yaml::parse;
///
/// let root = parse("coreos:\n  etcd:\n    discovery: disco\n").unwrap();
/// let discovery = root.get("coreos").and_then(|c| c.get("etcd")).and_then(|e| e.get("discovery"));
/// assert_eq!(discovery.map(|n| n.line), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters)
    pub col: usize,

    pub kind: NodeKind,
}

/// The four shapes a node can take.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An explicit or implicit null, including an empty value.
    Null,

    Scalar(Scalar),

    /// Sequence items in document order.
    Sequence(Vec<Node>),

    /// Mapping entries in document order. Duplicate keys are kept.
    Mapping(Vec<MappingEntry>),
}

/// A scalar value.
///
/// Holds the text as the scanner produced it alongside the resolved YAML
/// value. A scalar tagged `!!binary` also holds its decoded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    /// Scalar text after unescaping, without quotes.
    pub text: String,

    /// Resolved value (string, integer, real or boolean).
    pub value: Yaml,

    /// Explicit tag, with the standard `tag:yaml.org,2002:` prefix shortened
    /// to `!!` (e.g. `!!binary`, `!!str`).
    pub tag: Option<String>,

    binary: Option<Vec<u8>>,
}

/// A key/value pair in a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: Node,
    pub value: Node,
}

impl Scalar {
    /// Create a plain (untagged) scalar.
    pub fn new(text: impl Into<String>, value: Yaml) -> Self {
        Self {
            text: text.into(),
            value,
            tag: None,
            binary: None,
        }
    }

    /// Create a `!!binary` scalar from its source text and decoded bytes.
    pub fn binary(text: impl Into<String>, bytes: Vec<u8>) -> Self {
        let text = text.into();
        Self {
            value: Yaml::String(text.clone()),
            text,
            tag: Some("!!binary".to_string()),
            binary: Some(bytes),
        }
    }

    /// Attach an explicit tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether this scalar was tagged `!!binary` in the source.
    pub fn is_binary(&self) -> bool {
        self.binary.is_some()
    }

    /// The content bytes: decoded bytes for binary scalars, UTF-8 text otherwise.
    pub fn bytes(&self) -> &[u8] {
        match &self.binary {
            Some(bytes) => bytes,
            None => self.text.as_bytes(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Node {
    pub fn new(kind: NodeKind, line: usize, col: usize) -> Self {
        Self { line, col, kind }
    }

    pub fn null(line: usize, col: usize) -> Self {
        Self::new(NodeKind::Null, line, col)
    }

    pub fn scalar(scalar: Scalar, line: usize, col: usize) -> Self {
        Self::new(NodeKind::Scalar(scalar), line, col)
    }

    pub fn sequence(items: Vec<Node>, line: usize, col: usize) -> Self {
        Self::new(NodeKind::Sequence(items), line, col)
    }

    pub fn mapping(entries: Vec<MappingEntry>, line: usize, col: usize) -> Self {
        Self::new(NodeKind::Mapping(entries), line, col)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Scalar text, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().map(Scalar::as_str)
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[MappingEntry]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Find the last mapping entry whose key text satisfies `pred`.
    ///
    /// The last match wins so that a repeated key behaves like an overwrite.
    pub fn find_entry(&self, pred: impl Fn(&str) -> bool) -> Option<&MappingEntry> {
        self.as_mapping()?
            .iter()
            .rev()
            .find(|entry| pred(&entry.key_name()))
    }

    /// Get a mapping value by exact key (case-sensitive).
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.find_entry(|name| name == key).map(|entry| &entry.value)
    }

    /// Short name of the node's shape, for messages and logs.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Null => "null",
            NodeKind::Scalar(_) => "scalar",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Mapping(_) => "mapping",
        }
    }

    /// Number of nodes in this subtree, counting mapping keys.
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            NodeKind::Null | NodeKind::Scalar(_) => 0,
            NodeKind::Sequence(items) => items.iter().map(Node::node_count).sum(),
            NodeKind::Mapping(entries) => entries
                .iter()
                .map(|entry| entry.key.node_count() + entry.value.node_count())
                .sum(),
        }
    }

    /// Move this node and all of its descendants to one position.
    pub(crate) fn relocate(&mut self, line: usize, col: usize) {
        self.line = line;
        self.col = col;
        match &mut self.kind {
            NodeKind::Null | NodeKind::Scalar(_) => {}
            NodeKind::Sequence(items) => {
                for item in items {
                    item.relocate(line, col);
                }
            }
            NodeKind::Mapping(entries) => {
                for entry in entries {
                    entry.key.relocate(line, col);
                    entry.value.relocate(line, col);
                }
            }
        }
    }
}

impl MappingEntry {
    pub fn new(key: Node, value: Node) -> Self {
        Self { key, value }
    }

    /// The line of the key, which is where the entry is reported.
    pub fn line(&self) -> usize {
        self.key.line
    }

    /// The key as text. Collection keys have no natural name and are shown
    /// by shape.
    pub fn key_name(&self) -> Cow<'_, str> {
        match &self.key.kind {
            NodeKind::Scalar(scalar) => Cow::Borrowed(scalar.as_str()),
            NodeKind::Null => Cow::Borrowed(""),
            NodeKind::Sequence(_) => Cow::Borrowed("[...]"),
            NodeKind::Mapping(_) => Cow::Borrowed("{...}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(text: &str, line: usize) -> Node {
        Node::scalar(Scalar::new(text, Yaml::String(text.into())), line, 1)
    }

    #[test]
    fn test_scalar_creation() {
        let node = string("test", 1);
        assert!(node.is_scalar());
        assert!(!node.is_sequence());
        assert!(!node.is_mapping());
        assert_eq!(node.as_str(), Some("test"));
        assert_eq!(node.kind_name(), "scalar");
    }

    #[test]
    fn test_binary_scalar_bytes() {
        let scalar = Scalar::binary("aGk=", b"hi".to_vec());
        assert!(scalar.is_binary());
        assert_eq!(scalar.bytes(), b"hi");
        assert_eq!(scalar.tag.as_deref(), Some("!!binary"));

        let plain = Scalar::new("aGk=", Yaml::String("aGk=".into()));
        assert!(!plain.is_binary());
        assert_eq!(plain.bytes(), b"aGk=");
    }

    #[test]
    fn test_node_count() {
        assert_eq!(string("a", 1).node_count(), 1);
        let node = Node::mapping(
            vec![MappingEntry::new(
                string("keys", 1),
                Node::sequence(vec![string("x", 2), string("y", 3)], 2, 3),
            )],
            1,
            1,
        );
        assert_eq!(node.node_count(), 5);
    }

    #[test]
    fn test_get_prefers_last_duplicate() {
        let node = Node::mapping(
            vec![
                MappingEntry::new(string("a", 1), string("first", 1)),
                MappingEntry::new(string("a", 2), string("second", 2)),
            ],
            1,
            1,
        );
        assert_eq!(node.get("a").and_then(Node::as_str), Some("second"));
        assert_eq!(node.find_entry(|k| k == "a").map(MappingEntry::line), Some(2));
        assert!(node.get("A").is_none());
    }

    #[test]
    fn test_relocate_moves_descendants() {
        let mut node = Node::sequence(vec![string("a", 2), string("b", 3)], 2, 3);
        node.relocate(9, 4);
        assert_eq!(node.line, 9);
        for item in node.as_sequence().unwrap() {
            assert_eq!((item.line, item.col), (9, 4));
        }
    }

    #[test]
    fn test_collection_key_names() {
        let entry = MappingEntry::new(Node::sequence(vec![], 1, 1), Node::null(1, 1));
        assert_eq!(entry.key_name(), "[...]");
    }
}
