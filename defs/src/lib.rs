//! Declarative command definitions for argbind.
//!
//! Programs can declare their commands in a YAML or JSON file instead of
//! building [`CommandSchema`](argbind_core::CommandSchema)s in code.
//! [`ProgramDefinition::load`] reads such a file and
//! [`ProgramDefinition::into_registry`] turns it into a
//! [`Registry`](argbind_core::Registry).
//!
//! # Example
//!
//! ```
//! use argbind_defs::ProgramDefinition;
//!
//! let definition = ProgramDefinition::from_yaml_str(r#"
//! program: prg
//! commands:
//!   - name: test
//!     properties:
//!       - { name: Mode, aliases: ["--mode", "-m"], mandatory: true }
//!       - { name: Value, aliases: ["0"], value: integer, mandatory: true }
//! "#).unwrap();
//!
//! let registry = definition.into_registry().unwrap();
//! let selected = registry.select_args(["-m", "JUnit", "42"]).unwrap();
//! assert_eq!(selected.bindings().integer("Value"), Some(42));
//! ```

mod definition;
mod error;

pub use definition::{
    CommandDefinition, Format, GroupDefinition, ProgramDefinition, PropertyDefinition,
    PropertyKindDefinition, ValueDefinition,
};
pub use error::{DefinitionError, Result};
