//! Validated, alias-indexed command schemas.
//!
//! A [`CommandSchema`] is built once at program startup from an ordered list
//! of [`PropertyDescriptor`]s and is read-only afterwards. Building validates
//! the declaration and indexes every alias and positional slot for the
//! matcher.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{CommandSchema, PropertyDescriptor, ValueParser};
//!
//! let schema = CommandSchema::builder("Test")
//!     .property(PropertyDescriptor::scalar("Mode", ValueParser::Text).aliases(["--mode", "-m"]).mandatory())
//!     .property(PropertyDescriptor::scalar("Value", ValueParser::Integer).alias("0").mandatory())
//!     .property(PropertyDescriptor::collection("Keys", ValueParser::Text).alias("--key"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.property("-m").unwrap().name(), "Mode");
//! assert_eq!(schema.positional(0).unwrap().name(), "Value");
//! assert_eq!(schema.usage("prg"), "prg --mode|-m <mode> [--key <key>...] <value>");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::bind::Bindings;
use crate::error::SchemaError;
use crate::property::PropertyDescriptor;
use crate::token::Token;
use crate::validate;

/// Command body run after a successful match; returns the exit code.
pub type Handler = Arc<dyn Fn(&Bindings) -> i32 + Send + Sync>;

/// Validated property set of one command.
pub struct CommandSchema {
    name: String,
    help: Option<String>,
    properties: Vec<PropertyDescriptor>,
    aliases: HashMap<String, usize>,
    positionals: Vec<usize>,
    handler: Option<Handler>,
}

impl CommandSchema {
    /// Starts a [`SchemaBuilder`].
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            help: None,
            properties: Vec::new(),
            handler: None,
        }
    }

    /// Builds a schema from its properties.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the declaration violates a structural
    /// rule: duplicate aliases, non-contiguous positional indices, values
    /// after a vararg, or a mandatory value after an optional one.
    pub fn new(
        name: impl Into<String>,
        properties: Vec<PropertyDescriptor>,
    ) -> Result<Self, SchemaError> {
        Self::builder(name).properties(properties).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Properties in display order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Property registered under the given alias.
    pub fn property(&self, alias: &str) -> Option<&PropertyDescriptor> {
        self.aliases.get(alias).map(|&i| &self.properties[i])
    }

    pub fn property_by_name(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Property bound to the positional slot `index`.
    pub fn positional(&self, index: usize) -> Option<&PropertyDescriptor> {
        self.positionals.get(index).map(|&i| &self.properties[i])
    }

    /// Names of the mandatory properties.
    pub fn mandatory_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties
            .iter()
            .filter(|p| p.is_mandatory())
            .map(PropertyDescriptor::name)
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// One usage line: the program name followed by each property's usage.
    pub fn usage(&self, program: &str) -> String {
        let mut line = program.to_string();
        for property in &self.properties {
            line.push(' ');
            line.push_str(&property.usage());
        }
        line
    }

    /// Resolves the slot a token fills.
    ///
    /// Options are looked up by their literal. Values, and options the
    /// schema does not know when the current positional slot is a wildcard,
    /// go to the positional slot under `cursor`. The cursor advances unless
    /// that slot is a vararg.
    pub(crate) fn resolve(&self, token: &Token, cursor: &mut usize) -> Option<Slot<'_>> {
        if token.is_option() {
            if let Some(property) = self.property(token.text()) {
                return Some(Slot::Option(property));
            }
        }
        let property = self.positional(*cursor)?;
        if !property.is_wildcard()
            && (token.is_option() || !property.accepts_positional(token.text()))
        {
            return None;
        }
        if !property.is_vararg() {
            *cursor += 1;
        }
        Some(Slot::Positional(property))
    }
}

/// How a token was resolved against a schema.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Slot<'a> {
    /// Named by one of the property's option literals.
    Option(&'a PropertyDescriptor),
    /// Taken by the positional property under the cursor.
    Positional(&'a PropertyDescriptor),
}

impl<'a> Slot<'a> {
    pub(crate) fn property(self) -> &'a PropertyDescriptor {
        match self {
            Self::Option(p) | Self::Positional(p) => p,
        }
    }
}

impl fmt::Debug for CommandSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSchema")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("handler", &self.handler.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CommandSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for [`CommandSchema`].
pub struct SchemaBuilder {
    name: String,
    help: Option<String>,
    properties: Vec<PropertyDescriptor>,
    handler: Option<Handler>,
}

impl SchemaBuilder {
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn properties(mut self, properties: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the command body run by [`Match::run`](crate::Match::run).
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Bindings) -> i32 + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Validates and indexes the declaration.
    ///
    /// # Errors
    ///
    /// See [`CommandSchema::new`].
    pub fn build(self) -> Result<CommandSchema, SchemaError> {
        let layout = validate::layout(&self.name, self.properties)?;
        Ok(CommandSchema {
            name: self.name,
            help: self.help,
            properties: layout.properties,
            aliases: layout.aliases,
            positionals: layout.positionals,
            handler: self.handler,
        })
    }
}
