#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! A forgiving JSON toolkit: a plain value tree, a diagnostic-driven parser
//! and a configurable renderer.
//!
//! The parser never fails. Every deviation from well-formed JSON (which here
//! includes `//` and `/* */` comments) is handed to a diagnostic sink that
//! decides per incident whether to patch-and-continue or abort with the
//! partial tree built so far. The [`Value`] tree offers both lenient access
//! (indexing that auto-vivifies on the mutable path) and strict `try_`/`at`
//! accessors that return errors, and [`Pointer`] addresses nodes by
//! RFC 6901 JSON pointers.
//!
//! ```
//! use lenient_json::{parse_with, Recovery, RenderOptions, Value};
//!
//! // A comment and a missing comma: one diagnostic, then the parser repairs.
//! let mut notes = Vec::new();
//! let doc = parse_with(
//!     "{ \"host\": \"db1\" // primary\n  \"port\": 5432 }",
//!     |d| {
//!         notes.push(d.to_string());
//!         Recovery::Continue
//!     },
//! );
//! assert_eq!(doc["port"], Value::from(5432));
//! assert_eq!(notes.len(), 1);
//!
//! // Auto-vivification on the mutable path.
//! let mut cfg = Value::Null;
//! cfg["servers"][0]["port"] = 80.into();
//! assert_eq!(
//!     cfg.render(&RenderOptions::compact()),
//!     r#"{"servers":[{"port":80}]}"#
//! );
//! ```

pub mod error;
mod parser;
pub mod pointer;
mod render;
mod ser;
pub mod utf8;
pub mod value;

pub use error::{
    AccessError, Diagnostic, DiagnosticKind, Origin, ParseError, PointerError, Recovery,
};
pub use parser::{parse, parse_one, parse_one_with, parse_with, try_parse, Parser};
pub use pointer::Pointer;
pub use render::RenderOptions;
pub use value::{Kind, Number, Value};
