//! Error types for schema declaration, invocation matching and value parsing.
//!
//! [`SchemaError`] signals a programmer error in how commands were declared
//! and is raised while building schemas. [`CliError`] signals bad user input
//! and is raised while matching an invocation. Keeping them apart lets a
//! program pick different exit codes.

use thiserror::Error;

/// Structural errors in a command declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A property was declared without any alias.
    #[error("property {property} of command {command} has no alias")]
    MissingAlias { command: String, property: String },

    /// A property declared more than one positional index.
    #[error("property {property} of command {command} declares more than one positional index")]
    MultipleIndices { command: String, property: String },

    /// A non-option property has no positional index.
    #[error("value {command}.{property} needs a positional index alias")]
    MissingIndex { command: String, property: String },

    /// An option alias was combined with the wildcard marker.
    #[error("invalid property {command}.{property} - option may not be a wildcard")]
    WildcardOption { command: String, property: String },

    /// Two properties share an alias.
    #[error("duplicate alias '{alias}': {command}.{property} - already mapped to {command}.{existing}")]
    DuplicateAlias {
        command: String,
        alias: String,
        property: String,
        existing: String,
    },

    /// Positional indices are not contiguous from zero.
    #[error(
        "invalid value {command}.{property} with index {index} but expected index {expected}"
    )]
    IndexMismatch {
        command: String,
        property: String,
        index: usize,
        expected: usize,
    },

    /// A positional value follows a vararg value.
    #[error(
        "invalid value {command}.{property} with index {index} - no further value is allowed after vararg {vararg}"
    )]
    ValueAfterVararg {
        command: String,
        property: String,
        index: usize,
        vararg: String,
    },

    /// A mandatory positional value follows an optional one.
    #[error(
        "invalid value {command}.{property} with index {index} can not be mandatory if previous value is optional"
    )]
    MandatoryAfterOptional {
        command: String,
        property: String,
        index: usize,
    },

    /// Two groups were registered under the same name.
    #[error("duplicate command group: {0}")]
    DuplicateGroup(String),

    /// A standalone command was addressed as a group.
    #[error("{0} is a standalone command, not a command group")]
    StandaloneGroup(String),
}

/// Errors caused by the arguments of one invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The same option literal was given more than once while duplicates are
    /// not tolerated.
    #[error("duplicate options: {}", .0.join(", "))]
    DuplicateOptions(Vec<String>),

    /// Two synonymous options were given together.
    #[error("duplicate options '{first}' and '{second}'")]
    DuplicateOptionAlias { first: String, second: String },

    /// No arguments were given and no command accepts an empty invocation.
    #[error(
        "no arguments were specified. Please call with --help to read usage and provide required arguments"
    )]
    NoArguments,

    /// The arguments did not match any registered command.
    #[error("invalid arguments: {command_line}")]
    InvalidUsage { command_line: String },

    /// An option expecting a value was followed by another option or nothing.
    #[error("option '{option}' has to be followed by a value for {property}")]
    MissingOptionValue { option: String, property: String },

    /// A value could not be parsed for its property.
    #[error("invalid value '{value}' for {property}: {source}")]
    InvalidValue {
        property: String,
        value: String,
        #[source]
        source: ParseError,
    },
}

/// Failure of a [`ValueParser`](crate::ValueParser).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected an integer")]
    InvalidInteger,

    #[error("expected a number")]
    InvalidFloat,

    #[error("expected true or false")]
    InvalidBool,

    #[error("expected one of: {}", .0.join(", "))]
    UnknownChoice(Vec<String>),

    #[error("{0}")]
    Custom(String),
}
