//! YAML parser that builds line-annotated [`Node`] trees.

use crate::{Error, MappingEntry, Node, Result, Scalar};
use base64::prelude::*;
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Yaml;

const CORE_SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

/// Most nodes alias expansion may create in one document.
pub const MAX_ALIAS_NODES: usize = 100_000;

/// Parse a YAML document into a [`Node`] tree.
///
/// Empty, whitespace-only and comment-only input yields a null root at
/// line 1. The stream must hold at most one document.
///
/// # Example
///
/// ```rust
/// use cloud_config_yaml::parse;
///
/// let root = parse("#cloud-config\nhostname: node1").unwrap();
/// assert_eq!(root.line, 2);
/// assert!(parse("   \n").unwrap().is_null());
/// ```
///
/// # Errors
///
/// Returns an error carrying the line where the parser lost synchronization.
pub fn parse(content: &str) -> Result<Node> {
    if content.trim().is_empty() {
        return Ok(Node::null(1, 1));
    }

    let mut parser = Parser::new_from_str(content);
    let mut builder = NodeBuilder::new();

    parser
        .load(&mut builder, true)
        .map_err(|err| Error::from_scan(&err, content))?;

    builder.result()
}

/// Parse a YAML document from raw bytes, which must be UTF-8.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] at the line holding the first invalid
/// byte, or any error [`parse`] returns.
pub fn parse_bytes(content: &[u8]) -> Result<Node> {
    let text = std::str::from_utf8(content).map_err(|err| {
        let valid = &content[..err.valid_up_to()];
        Error::InvalidUtf8 {
            line: 1 + valid.iter().filter(|&&b| b == b'\n').count(),
        }
    })?;
    parse(text)
}

/// Builder that implements MarkedEventReceiver to construct a Node tree.
struct NodeBuilder {
    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Completed anchored nodes and their node counts, by anchor id
    anchors: HashMap<usize, (Node, usize)>,

    /// Nodes created so far by alias expansion
    expanded: usize,

    documents: usize,

    /// The completed root node
    root: Option<Node>,

    /// First failure; later events are ignored once set
    error: Option<Error>,
}

/// A collection being constructed during parsing.
enum BuildNode {
    Sequence {
        start_marker: Marker,
        anchor_id: usize,
        items: Vec<Node>,
    },

    Mapping {
        start_marker: Marker,
        anchor_id: usize,
        entries: Vec<(Node, Option<Node>)>,
    },
}

impl NodeBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            anchors: HashMap::new(),
            expanded: 0,
            documents: 0,
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Node> {
        if let Some(err) = self.error {
            return Err(err);
        }
        // A stream with no document at all (only comments) has nothing to check.
        Ok(self.root.unwrap_or_else(|| Node::null(1, 1)))
    }

    fn push_complete(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => match entries.last_mut() {
                Some((_, value @ None)) => *value = Some(node),
                _ => entries.push((node, None)),
            },
        }
    }

    fn remember(&mut self, anchor_id: usize, node: &Node) {
        if anchor_id > 0 {
            self.anchors
                .insert(anchor_id, (node.clone(), node.node_count()));
        }
    }
}

/// Build the node for one scalar event.
fn scalar_node(
    value: String,
    style: TScalarStyle,
    tag: Option<Tag>,
    marker: &Marker,
) -> Result<Node> {
    let (line, col) = position(marker);
    let tag = tag.map(|tag| short_tag(&tag));

    match tag.as_deref() {
        Some("!!binary") => {
            let encoded: String = value.split_ascii_whitespace().collect();
            let bytes = BASE64_STANDARD
                .decode(encoded)
                .map_err(|_| Error::InvalidBinary { line })?;
            Ok(Node::scalar(Scalar::binary(value, bytes), line, col))
        }
        Some("!!str") => {
            let scalar = Scalar::new(value.clone(), Yaml::String(value)).with_tag("!!str");
            Ok(Node::scalar(scalar, line, col))
        }
        _ => {
            let resolved = if matches!(style, TScalarStyle::Plain) {
                resolve_plain_scalar(&value)
            } else {
                Yaml::String(value.clone())
            };
            if resolved.is_null() && tag.is_none() {
                return Ok(Node::null(line, col));
            }
            let mut scalar = Scalar::new(value, resolved);
            scalar.tag = tag;
            Ok(Node::scalar(scalar, line, col))
        }
    }
}

impl MarkedEventReceiver for NodeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing => {}
            Event::StreamStart => {}
            Event::StreamEnd => {}
            Event::DocumentEnd => {}

            Event::DocumentStart => {
                self.documents += 1;
                if self.documents > 1 {
                    self.error = Some(Error::MultipleDocuments {
                        line: position(&marker).0,
                    });
                }
            }

            Event::Scalar(value, style, anchor_id, tag) => {
                match scalar_node(value, style, tag, &marker) {
                    Ok(node) => {
                        self.remember(anchor_id, &node);
                        self.push_complete(node);
                    }
                    Err(err) => self.error = Some(err),
                }
            }

            Event::SequenceStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    start_marker: marker,
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                let Some(BuildNode::Sequence {
                    start_marker,
                    anchor_id,
                    items,
                }) = self.stack.pop()
                else {
                    return;
                };
                let (line, col) = position(&start_marker);
                let node = Node::sequence(items, line, col);
                self.remember(anchor_id, &node);
                self.push_complete(node);
            }

            Event::MappingStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    start_marker: marker,
                    anchor_id,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => {
                let Some(BuildNode::Mapping {
                    start_marker,
                    anchor_id,
                    entries,
                }) = self.stack.pop()
                else {
                    return;
                };
                let (line, col) = position(&start_marker);
                let entries = entries
                    .into_iter()
                    .map(|(key, value)| {
                        let value = value.unwrap_or_else(|| Node::null(key.line, key.col));
                        MappingEntry::new(key, value)
                    })
                    .collect();
                let node = Node::mapping(entries, line, col);
                self.remember(anchor_id, &node);
                self.push_complete(node);
            }

            Event::Alias(anchor_id) => {
                let (line, col) = position(&marker);
                let node = match self.anchors.get(&anchor_id) {
                    Some((anchored, count)) => {
                        self.expanded += count;
                        if self.expanded > MAX_ALIAS_NODES {
                            self.error = Some(Error::AliasExpansion {
                                line,
                                limit: MAX_ALIAS_NODES,
                            });
                            return;
                        }
                        let mut node = anchored.clone();
                        node.relocate(line, col);
                        node
                    }
                    None => Node::null(line, col),
                };
                tracing::trace!(anchor_id, line, expanded = self.expanded, "resolved alias");
                self.push_complete(node);
            }
        }
    }
}

/// Convert a yaml-rust2 marker (1-based line, 0-based column) to a position.
fn position(marker: &Marker) -> (usize, usize) {
    (marker.line().max(1), marker.col() + 1)
}

fn short_tag(tag: &Tag) -> String {
    if tag.handle == CORE_SCHEMA_PREFIX || tag.handle == "!!" {
        format!("!!{}", tag.suffix)
    } else {
        format!("{}{}", tag.handle, tag.suffix)
    }
}

/// Resolve a plain scalar string into the appropriate Yaml type.
///
/// Follows YAML 1.1 conventions for booleans (`yes`, `off`, ...) since
/// cloud-config documents are written against a YAML 1.1 loader.
fn resolve_plain_scalar(value: &str) -> Yaml {
    if let Ok(i) = value.parse::<i64>() {
        return Yaml::Integer(i);
    }

    if value.bytes().any(|b| b.is_ascii_digit()) && value.parse::<f64>().is_ok() {
        return Yaml::Real(value.to_string());
    }

    match value {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            Yaml::Boolean(true)
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            Yaml::Boolean(false)
        }
        "null" | "Null" | "NULL" | "~" | "" => Yaml::Null,
        _ => Yaml::String(value.to_string()),
    }
}
