//! Atomic Core - Foundational types for the Atomic composition engine
//!
//! This crate provides the types every other Atomic crate depends on:
//! - `Value`, `Props` - Dynamic property values and ordered property maps
//! - `props!` - Literal constructor for property maps
//! - Error types and Result alias

mod error;
mod value;

pub use error::{AtomicError, Result};
pub use value::{from_value, value_type_name, Props, Value};
