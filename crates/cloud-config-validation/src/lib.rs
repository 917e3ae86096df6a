// Cloud-config validation
//
// This crate checks a cloud-config document against the cloud-config schema
// and a set of semantic rules, collecting every finding into one ordered
// report with source line numbers.

pub mod content;
pub mod path;
pub mod report;
pub mod rules;
pub mod schema;
pub mod user_data;
pub mod validator;
mod walk;

pub use content::{DecodeError, decode_content};
pub use report::{Entry, Report, Severity};
pub use rules::{RULES, Rule};
pub use schema::{CLOUD_CONFIG, Schema, StringSchema, StructSchema, normalize_key};
pub use user_data::{UserDataKind, classify};
pub use validator::{ValidateError, parse_cloud_config, validate, validate_user_data};
