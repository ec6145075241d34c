//! Typed values and the parse operations that produce them.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ParseError;

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

type ParseFn = dyn Fn(&str) -> Result<Value, ParseError> + Send + Sync;

/// Parse operation attached to a property.
///
/// # Examples
///
/// ```
/// use argbind_core::{Value, ValueParser};
///
/// let color = ValueParser::Choice(vec!["always".into(), "never".into()]);
/// assert_eq!(color.parse("NEVER").unwrap(), Value::Text("never".into()));
/// assert!(color.parse("sometimes").is_err());
///
/// assert_eq!(ValueParser::Integer.parse("42").unwrap(), Value::Integer(42));
/// ```
#[derive(Clone, Default)]
pub enum ValueParser {
    /// Any text, taken verbatim.
    #[default]
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// Floating point number.
    Float,
    /// `true` or `false`, case-insensitive.
    Bool,
    /// One of the listed literals.
    Choice(Vec<String>),
    /// Caller-supplied conversion.
    Custom(Arc<ParseFn>),
}

impl ValueParser {
    /// Wraps a closure as a [`ValueParser::Custom`].
    pub fn custom<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(parse))
    }

    /// Converts raw argument text.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] matching the expected type when `raw` is
    /// not acceptable.
    pub fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        match self {
            Self::Text => Ok(Value::Text(raw.to_string())),
            Self::Integer => raw
                .parse()
                .map(Value::Integer)
                .map_err(|_| ParseError::InvalidInteger),
            Self::Float => raw
                .parse()
                .map(Value::Float)
                .map_err(|_| ParseError::InvalidFloat),
            Self::Bool => parse_bool(raw).map(Value::Bool),
            Self::Choice(choices) => choices
                .iter()
                .find(|c| c.as_str() == raw)
                .or_else(|| choices.iter().find(|c| c.eq_ignore_ascii_case(raw)))
                .map(|c| Value::Text(c.clone()))
                .ok_or_else(|| ParseError::UnknownChoice(choices.clone())),
            Self::Custom(parse) => parse(raw),
        }
    }

    /// Literals offered by shell completion for this parser, if it has a
    /// closed set of values.
    pub fn literals(&self) -> Option<Vec<&str>> {
        match self {
            Self::Bool => Some(vec!["true", "false"]),
            Self::Choice(choices) => Some(choices.iter().map(String::as_str).collect()),
            _ => None,
        }
    }
}

impl fmt::Debug for ValueParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Integer => f.write_str("Integer"),
            Self::Float => f.write_str("Float"),
            Self::Bool => f.write_str("Bool"),
            Self::Choice(choices) => f.debug_tuple("Choice").field(choices).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub(crate) fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::InvalidBool)
    }
}
