//! Field extraction over the raw `Endpoints` response.
//!
//! Only `ip`, `nodeName` and `name` are ever needed, so the payload is searched
//! for literal markers instead of being parsed. String values are taken verbatim
//! up to the next `"`; escaped quotes are not supported.

pub mod endpoint_scanner;
pub mod field_scanner;

pub use endpoint_scanner::scan;
pub use field_scanner::{find_field_value, FieldValue};
