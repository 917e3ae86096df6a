//! # cloud-config-yaml
//!
//! YAML parsing with source line tracking.
//!
//! This crate provides [`Node`], an owned YAML tree in which every node
//! remembers the line and column where it begins. Validators walk the tree
//! and attribute their findings to those lines; they never need the source
//! text again.
//!
//! ## Design
//!
//! The parser is a `yaml-rust2` event receiver. Scalars keep both the text as
//! written and the resolved `yaml_rust2::Yaml` value, so a check can look at
//! whichever it needs: `hostname: 4` is an integer to the type checker and the
//! string `"4"` to a pattern check. Scalars tagged `!!binary` carry their
//! decoded bytes.
//!
//! ## Example
//!
//! ```rust
//! use cloud_config_yaml::parse;
//!
//! let root = parse("hostname: node1\nusers:\n  - name: core\n").unwrap();
//! let users = root.get("users").unwrap();
//! assert_eq!(users.line, 3);
//! assert_eq!(users.as_sequence().unwrap()[0].line, 3);
//! ```

mod error;
mod node;
mod parser;

pub use error::{Error, Result};
pub use node::{MappingEntry, Node, NodeKind, Scalar};
pub use parser::{MAX_ALIAS_NODES, parse, parse_bytes};
pub use yaml_rust2::Yaml;
