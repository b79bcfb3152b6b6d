//! Serialization back to the wire format (RFC 5545 §3.1).

mod escape;
mod fold;
mod serializer;

pub use escape::{EncodedParamValue, EscapedText, escape_param_value, escape_text};
pub use fold::fold_line;
pub use serializer::{serialize, serialize_component, serialize_property};
