//! Deep merge of JSON-shaped configuration trees.
//!
//! The merge operates on raw [`serde_json::Value`] trees rather than
//! deserialized structs, so a key missing from the user layer never
//! overrides the default.

mod deep;
mod keys;

pub use deep::{deep_merge, deep_merge_all};
pub use keys::snake_case_keys;
