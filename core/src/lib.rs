//! Argument tokenizer, schema-driven command matcher and shell completion.
//!
//! This crate turns a raw argument vector into typed values bound to the
//! fields of a declared command:
//!
//! - [`Tokens`]: the argument vector classified into short options, long
//!   options and values, with short option clustering, `--name=value`
//!   assignments and the [`END_OPTIONS`] marker.
//! - [`PropertyDescriptor`]: a declared field with a name, aliases (option
//!   literals, a positional index or the [`ALIAS_WILDCARD`]), and a
//!   [`PropertyKind`] with its [`ValueParser`].
//! - [`CommandSchema`]: the validated, alias-indexed properties of one
//!   command; [`CommandSchema::bind`] matches tokens and produces
//!   [`Bindings`].
//! - [`Registry`]: ordered [`CommandGroup`]s; [`Registry::select`] picks the
//!   first command that matches and [`Registry::complete`] collects shell
//!   completions.
//!
//! Declaration mistakes surface as [`SchemaError`] when a schema is built.
//! Bad input surfaces as [`CliError`] when a command is selected.
//!
//! The crate performs no I/O. It emits `tracing` events explaining why a
//! command was rejected.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let mut registry = Registry::new();
//! registry
//!     .add(
//!         CommandSchema::builder("Test")
//!             .property(PropertyDescriptor::scalar("Mode", ValueParser::Text).aliases(["--mode", "-m"]).mandatory())
//!             .property(PropertyDescriptor::scalar("Value", ValueParser::Integer).alias("0").mandatory())
//!             .property(PropertyDescriptor::collection("Keys", ValueParser::Text).alias("--key"))
//!             .build()?,
//!     )?;
//!
//! let selected = registry.select_args(["--mode", "JUnit", "42", "--key=a", "--key", "b,c"])?;
//! let bindings = selected.bindings();
//! assert_eq!(bindings.text("Mode"), Some("JUnit"));
//! assert_eq!(bindings.integer("Value"), Some(42));
//! assert_eq!(bindings.many("Keys").len(), 3);
//!
//! assert!(matches!(registry.select_args(["42"]), Err(CliError::InvalidUsage { .. })));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bind;
mod complete;
mod error;
mod property;
mod registry;
mod schema;
mod token;
mod validate;
mod value;

pub use bind::{Binding, Bindings};
pub use error::{CliError, ParseError, SchemaError};
pub use property::{ALIAS_WILDCARD, PropertyCategory, PropertyDescriptor, PropertyKind, is_index};
pub use registry::{CommandGroup, Match, Registry};
pub use schema::{CommandSchema, Handler, SchemaBuilder};
pub use token::{END_OPTIONS, Token, Tokens, ValueType};
pub use value::{Value, ValueParser};
