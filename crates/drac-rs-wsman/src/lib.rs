// src/lib.rs

#![doc = "Extracts field values from WS-Management (WSMAN) response documents."]
#![doc = ""]
#![doc = "The responses come from iDRAC lifecycle controllers. Fields are elements"]
#![doc = "namespaced by the resource URI of the CIM class that returned them."]
#![doc = ""]
#![doc = "It supports:"]
#![doc = "- `Document::parse`: Building a read-only element tree from a response body."]
#![doc = "- `find_xml` / `find_all_xml`: Namespaced descendant lookup."]
#![doc = "- `get_attribute` / `get_all_attributes`: Field text with nil/missing handling."]
#![doc = "- `build_result`: The commit/reboot record of configuration changes."]
#![doc = "- `validate_integer`: Input validation with an error accumulator."]

// --- Crate Modules ---

mod document;
mod error;
mod extract;
mod log;
mod query;
mod result;
mod status;
mod validate;

// --- Public API Re-exports ---

pub use document::{Descendants, Document, Element, MAX_DEPTH, QualifiedName};
pub use error::WsmanError;
pub use extract::{FieldOptions, get_all_attributes, get_attribute};
pub use query::{ElementQuery, Field, NS_XML_SCHEMA_INSTANCE, find_all_xml, find_xml, is_non_nil};
pub use result::{CommitResult, RebootValue, ResultOverrides, build_result};
pub use status::{
    RebootRequired, ReturnValue, commit_pending, reboot_policy, reboot_requested, return_value,
};
pub use validate::{ValidationErrors, validate_integer};
