//! Structural validation of command declarations.
//!
//! Catches declaration mistakes when a schema is built, before any argument
//! is matched against it:
//!
//! - properties without aliases, with several positional indices, or mixing
//!   option aliases with the wildcard marker,
//! - non-option properties without a positional index,
//! - aliases shared by two properties,
//! - positional indices that are not contiguous from zero, values after a
//!   vararg, and mandatory values after optional ones.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{CommandSchema, PropertyDescriptor, SchemaError, ValueParser};
//!
//! let err = CommandSchema::builder("Gap")
//!     .property(PropertyDescriptor::scalar("Value1", ValueParser::Integer).alias("0").mandatory())
//!     .property(PropertyDescriptor::scalar("Value2", ValueParser::Text).alias("2").mandatory())
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, SchemaError::IndexMismatch { index: 2, expected: 1, .. }));
//! ```

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::property::PropertyDescriptor;

/// Validated and indexed property set of one command.
pub(crate) struct Layout {
    /// Properties in display order.
    pub(crate) properties: Vec<PropertyDescriptor>,
    /// Alias to position in `properties`.
    pub(crate) aliases: HashMap<String, usize>,
    /// Positions in `properties` of the positional values, by index.
    pub(crate) positionals: Vec<usize>,
}

pub(crate) fn layout(
    command: &str,
    mut properties: Vec<PropertyDescriptor>,
) -> Result<Layout, SchemaError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for property in &properties {
        validate_shape(command, property)?;
        for alias in property.aliases_list() {
            if let Some(existing) = owners.insert(alias.as_str(), property.name()) {
                return Err(SchemaError::DuplicateAlias {
                    command: command.to_string(),
                    alias: alias.clone(),
                    property: property.name().to_string(),
                    existing: existing.to_string(),
                });
            }
        }
    }

    properties.sort_by(|a, b| a.display_cmp(b));

    let aliases = properties
        .iter()
        .enumerate()
        .flat_map(|(i, p)| p.aliases_list().iter().map(move |alias| (alias.clone(), i)))
        .collect();

    let mut positionals: Vec<usize> = (0..properties.len())
        .filter(|&i| !properties[i].is_option())
        .collect();
    positionals.sort_by_key(|&i| properties[i].index());
    validate_positionals(command, &properties, &positionals)?;

    Ok(Layout {
        properties,
        aliases,
        positionals,
    })
}

fn validate_shape(command: &str, property: &PropertyDescriptor) -> Result<(), SchemaError> {
    let names = || (command.to_string(), property.name().to_string());
    if property.aliases_list().is_empty() {
        let (command, property) = names();
        return Err(SchemaError::MissingAlias { command, property });
    }
    if property.indices().count() > 1 {
        let (command, property) = names();
        return Err(SchemaError::MultipleIndices { command, property });
    }
    if property.is_option() && property.is_wildcard() {
        let (command, property) = names();
        return Err(SchemaError::WildcardOption { command, property });
    }
    if !property.is_option() && property.index().is_none() {
        let (command, property) = names();
        return Err(SchemaError::MissingIndex { command, property });
    }
    Ok(())
}

fn validate_positionals(
    command: &str,
    properties: &[PropertyDescriptor],
    positionals: &[usize],
) -> Result<(), SchemaError> {
    let mut previous_mandatory = true;
    let mut vararg: Option<&PropertyDescriptor> = None;
    for (expected, &position) in positionals.iter().enumerate() {
        let property = &properties[position];
        let index = property.index().unwrap_or_default();
        if let Some(vararg) = vararg {
            return Err(SchemaError::ValueAfterVararg {
                command: command.to_string(),
                property: property.name().to_string(),
                index,
                vararg: vararg.name().to_string(),
            });
        }
        if index != expected {
            return Err(SchemaError::IndexMismatch {
                command: command.to_string(),
                property: property.name().to_string(),
                index,
                expected,
            });
        }
        if previous_mandatory {
            previous_mandatory = property.is_mandatory();
        } else if property.is_mandatory() {
            return Err(SchemaError::MandatoryAfterOptional {
                command: command.to_string(),
                property: property.name().to_string(),
                index,
            });
        }
        if property.is_vararg() {
            vararg = Some(property);
        }
    }
    Ok(())
}
