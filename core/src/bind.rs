//! Matching a token sequence against one schema and binding its values.
//!
//! [`CommandSchema::bind`] walks the tokens left to right. Options are looked
//! up by literal and take the following value when they need one; plain
//! values fill the positional slots in index order. The schema matches when
//! every token found a property and every mandatory property was bound.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{CommandSchema, PropertyDescriptor, Tokens, ValueParser};
//!
//! let schema = CommandSchema::builder("Test")
//!     .property(PropertyDescriptor::scalar("Mode", ValueParser::Text).aliases(["--mode", "-m"]).mandatory())
//!     .property(PropertyDescriptor::scalar("Value", ValueParser::Integer).alias("0").mandatory())
//!     .build()
//!     .unwrap();
//!
//! let bindings = schema.bind(&Tokens::parse(["--mode", "JUnit", "42"])).unwrap().unwrap();
//! assert_eq!(bindings.text("Mode"), Some("JUnit"));
//! assert_eq!(bindings.integer("Value"), Some(42));
//!
//! assert!(schema.bind(&Tokens::parse(["42"])).unwrap().is_none());
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, ParseError};
use crate::property::{PropertyDescriptor, PropertyKind};
use crate::schema::{CommandSchema, Slot};
use crate::token::{Token, Tokens, ValueType};
use crate::value::{Value, ValueParser, parse_bool};

/// Value bound to one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Flag(bool),
    Single(Value),
    Many(Vec<Value>),
}

impl Binding {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Single(v) => v.as_bool(),
            Self::Many(_) => None,
        }
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(v) => Some(v),
            _ => None,
        }
    }

    /// All values of a collection; a single value is a one element slice.
    pub fn as_many(&self) -> &[Value] {
        match self {
            Self::Many(values) => values,
            Self::Single(v) => std::slice::from_ref(v),
            Self::Flag(_) => &[],
        }
    }
}

/// Property values bound by a successful match, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings {
    values: BTreeMap<String, Binding>,
}

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether a flag was set. Unbound flags are `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Binding::as_flag).unwrap_or(false)
    }

    pub fn one(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Binding::as_single)
    }

    /// Values of a collection, empty when unbound.
    pub fn many(&self, name: &str) -> &[Value] {
        self.get(name).map(Binding::as_many).unwrap_or(&[])
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.one(name).and_then(Value::as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.one(name).and_then(Value::as_integer)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn set(&mut self, property: &PropertyDescriptor, binding: Binding) {
        self.values.insert(property.name().to_string(), binding);
    }

    fn push(&mut self, property: &PropertyDescriptor, value: Value) {
        let entry = self
            .values
            .entry(property.name().to_string())
            .or_insert_with(|| Binding::Many(Vec::new()));
        match entry {
            Binding::Many(values) => values.push(value),
            other => *other = Binding::Many(vec![value]),
        }
    }
}

impl CommandSchema {
    /// Matches the tokens against this schema and binds their values.
    ///
    /// Returns `Ok(None)` when the input does not fit this command: an
    /// unknown option, a value without a free positional slot, a wrong
    /// keyword, or a mandatory property left unbound.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingOptionValue`] when an option that needs a
    /// value is not followed by one, and [`CliError::InvalidValue`] when a
    /// value fails to parse.
    pub fn bind(&self, tokens: &Tokens) -> Result<Option<Bindings>, CliError> {
        let mut required: HashSet<&str> = self.mandatory_names().collect();
        let mut bindings = Bindings::default();
        let mut cursor = 0;
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let Some(slot) = self.resolve(token, &mut cursor) else {
                debug!(command = %self.name(), token = %token.text(), "Undefined argument");
                return Ok(None);
            };
            let property = slot.property();
            i = match slot {
                Slot::Option(_) => bind_option(property, tokens, i, &mut bindings)?,
                Slot::Positional(_) => bind_positional(property, tokens, i, &mut bindings)?,
            };
            required.remove(property.name());
        }
        if !required.is_empty() {
            let mut missing: Vec<&str> = required.into_iter().collect();
            missing.sort_unstable();
            debug!(command = %self.name(), missing = ?missing, "Mandatory properties not bound");
            return Ok(None);
        }
        Ok(Some(bindings))
    }
}

/// Binds the option at `index` and returns the index of the next unread
/// token.
fn bind_option(
    property: &PropertyDescriptor,
    tokens: &Tokens,
    index: usize,
    bindings: &mut Bindings,
) -> Result<usize, CliError> {
    let option = &tokens[index];
    let next = tokens.get(index + 1);
    match property.kind() {
        PropertyKind::Flag => match next.filter(|t| is_assigned(t)) {
            Some(value) => {
                let set = parse_bool(value.text())
                    .map_err(|source| invalid(property, value.text(), source))?;
                bindings.set(property, Binding::Flag(set));
                Ok(index + 2)
            }
            None => {
                bindings.set(property, Binding::Flag(true));
                Ok(index + 1)
            }
        },
        PropertyKind::Scalar(parser) => {
            let value = option_value(property, option, next)?;
            let parsed = parse(property, parser, value.text())?;
            bindings.set(property, Binding::Single(parsed));
            Ok(index + 2)
        }
        PropertyKind::Collection { element, .. } => {
            let value = option_value(property, option, next)?;
            if !is_assigned(value) && property.splits_on_comma() {
                for part in value.text().split(',') {
                    bindings.push(property, parse(property, element, part)?);
                }
            } else {
                bindings.push(property, parse(property, element, value.text())?);
            }
            Ok(index + 2)
        }
    }
}

/// Binds the positional token at `index` and returns the index of the next
/// unread token. A positional collection takes the whole run of acceptable
/// tokens.
fn bind_positional(
    property: &PropertyDescriptor,
    tokens: &Tokens,
    index: usize,
    bindings: &mut Bindings,
) -> Result<usize, CliError> {
    let token = &tokens[index];
    match property.kind() {
        PropertyKind::Flag => {
            let set = if property.is_keyword() {
                true
            } else {
                parse_bool(token.text()).map_err(|source| invalid(property, token.text(), source))?
            };
            bindings.set(property, Binding::Flag(set));
            Ok(index + 1)
        }
        PropertyKind::Scalar(parser) => {
            let parsed = parse(property, parser, token.text())?;
            bindings.set(property, Binding::Single(parsed));
            Ok(index + 1)
        }
        PropertyKind::Collection { element, .. } => {
            let mut next = index;
            while let Some(token) = tokens
                .get(next)
                .filter(|t| property.is_wildcard() || t.is_value())
            {
                if property.splits_on_comma() {
                    for part in token.text().split(',') {
                        bindings.push(property, parse(property, element, part)?);
                    }
                } else {
                    bindings.push(property, parse(property, element, token.text())?);
                }
                next += 1;
            }
            Ok(next)
        }
    }
}

fn option_value<'t>(
    property: &PropertyDescriptor,
    option: &Token,
    next: Option<&'t Token>,
) -> Result<&'t Token, CliError> {
    next.filter(|t| t.is_value()).ok_or_else(|| {
        debug!(option = %option.text(), property = %property.name(), "Option without value");
        CliError::MissingOptionValue {
            option: option.text().to_string(),
            property: property.name().to_string(),
        }
    })
}

/// `true` for a value written inline with its option (`--key=value`).
pub(crate) fn is_assigned(token: &Token) -> bool {
    token.value_type() == Some(ValueType::OptionAssignment)
}

fn parse(property: &PropertyDescriptor, parser: &ValueParser, raw: &str) -> Result<Value, CliError> {
    parser.parse(raw).map_err(|source| invalid(property, raw, source))
}

fn invalid(property: &PropertyDescriptor, raw: &str, source: ParseError) -> CliError {
    CliError::InvalidValue {
        property: property.name().to_string(),
        value: raw.to_string(),
        source,
    }
}

/// Whether a complete option value is acceptable for the property.
pub(crate) fn accepts_value(property: &PropertyDescriptor, value: &Token) -> bool {
    match property.kind() {
        PropertyKind::Flag => parse_bool(value.text()).is_ok(),
        PropertyKind::Scalar(parser) => parser.parse(value.text()).is_ok(),
        PropertyKind::Collection { element, .. } => {
            if !is_assigned(value) && property.splits_on_comma() {
                value.text().split(',').all(|part| element.parse(part).is_ok())
            } else {
                element.parse(value.text()).is_ok()
            }
        }
    }
}
