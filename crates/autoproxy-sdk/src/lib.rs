//! Autoproxy SDK - call surface for delegates and synthesized types
//!
//! This crate provides the minimal types and traits needed to implement a
//! delegate that a synthesized proxy forwards to, without depending on the
//! engine that builds those proxies.
//!
//! # Example
//!
//! ```ignore
//! use autoproxy_sdk::{MethodTable, Value};
//!
//! let mut table = MethodTable::new();
//! table.register("index", |_args| Ok(Value::str("OK")));
//! ```

#![warn(missing_docs)]

pub mod delegate;
pub mod error;
pub mod value;

pub use delegate::{Delegate, MethodFn, MethodTable};
pub use error::{InvokeError, InvokeResult};
pub use value::Value;
