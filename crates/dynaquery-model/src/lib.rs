//! DynamoDB wire-protocol model types for dynaquery.
//!
//! This crate holds everything that crosses the wire boundary: the
//! [`AttributeValue`] tagged union, the native [`Value`] type and its
//! marshalling codec, and the serde input/output structs for the DynamoDB
//! operations that the query layer produces. DynamoDB's JSON protocol makes
//! serde derives trivial, so all of these are hand-written.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;
pub mod value;

pub use attribute_value::AttributeValue;
pub use operations::Operation;
pub use value::{CodecError, Value, marshal, marshal_item, unmarshal, unmarshal_item};
