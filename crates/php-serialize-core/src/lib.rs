//! PHP serialize/unserialize for Rust.
//!
//! This crate reads and writes PHP's `serialize()` format, so Rust programs can
//! share caches, sessions and payloads with PHP applications without a PHP runtime.
//!
//! # Features
//!
//! - **Typed value model** - [`Value`] mirrors PHP's seven serializable types
//! - **serde encoder** - any `T: Serialize` encodes straight to PHP format
//! - **Custom hooks** - [`PhpSerialize`] lets a type emit its own bytes
//! - **Strict decoder** - rejects anything PHP itself would not produce
//! - **Detailed errors** - Precise error positions and messages
//!
//! # Quick Start
//!
//! ```rust
//! use php_serialize_core::{from_bytes, Value};
//!
//! let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
//! let value = from_bytes(data).unwrap();
//!
//! if let Value::Array(items) = &value {
//!     for (key, val) in items {
//!         println!("{} => {}", key, val);
//!     }
//! }
//! ```
//!
//! # Encoding host data
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! let mut scores = HashMap::new();
//! scores.insert("bob", 2);
//! scores.insert("alice", 1);
//!
//! let bytes = php_serialize_core::to_bytes(&scores).unwrap();
//! assert_eq!(bytes, br#"a:2:{s:5:"alice";i:1;s:3:"bob";i:2;}"#);
//! ```
//!
//! # Supported Types
//!
//! | PHP Type | Rust Type |
//! |----------|-----------|
//! | `null` | `Value::Null` |
//! | `bool` | `Value::Bool(bool)` |
//! | `int` | `Value::Int(i64)` |
//! | `float` | `Value::Float(f64)` |
//! | `string` | `Value::String(Vec<u8>)` |
//! | `array` | `Value::Array(Array)` |
//! | `object` | `Value::Object(Object)` |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::inline_always)]

pub mod de;
pub mod error;
pub mod ser;
pub mod value;

#[cfg(feature = "json")]
pub mod json;

pub use de::{from_bytes, from_bytes_with_config, DecoderConfig, Parser};
pub use error::{DecodeError, EncodeError, ErrorKind, InvalidKey, Result, TypeMismatch};
pub use ser::{encode, to_bytes, to_writer, PhpSerialize};
pub use value::{Array, ArrayKey, Field, Object, Type, Value, Visibility};

#[cfg(feature = "json")]
pub use json::to_json;
