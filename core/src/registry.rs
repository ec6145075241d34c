//! Ordered command groups and command selection.
//!
//! A [`Registry`] holds [`CommandGroup`]s in registration order. Selecting a
//! command walks the groups, and the commands within each group, in that
//! order and picks the first schema that binds the input. Registration order
//! is the only priority rule.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{CliError, CommandSchema, PropertyDescriptor, Registry, ValueParser};
//!
//! let mut registry = Registry::new();
//! registry.add(
//!     CommandSchema::builder("Version")
//!         .property(PropertyDescriptor::flag("Version").aliases(["--version", "-v"]).mandatory())
//!         .handler(|_| 0)
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let selected = registry.select_args(["-v"]).unwrap();
//! assert_eq!(selected.schema().name(), "Version");
//! assert!(matches!(registry.select_args(Vec::<String>::new()), Err(CliError::NoArguments)));
//! ```

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::bind::Bindings;
use crate::error::{CliError, SchemaError};
use crate::property::PropertyDescriptor;
use crate::schema::CommandSchema;
use crate::token::Tokens;

/// Named, ordered list of commands.
///
/// A standalone group holds exactly one command and is named after it.
#[derive(Debug)]
pub struct CommandGroup {
    name: String,
    commands: Vec<CommandSchema>,
    standalone: bool,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
            standalone: false,
        }
    }

    fn standalone(command: CommandSchema) -> Self {
        Self {
            name: command.name().to_string(),
            commands: vec![command],
            standalone: true,
        }
    }

    /// Appends a command, builder style.
    pub fn command(mut self, command: CommandSchema) -> Self {
        self.commands.push(command);
        self
    }

    pub fn push(&mut self, command: CommandSchema) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[CommandSchema] {
        &self.commands
    }

    pub fn is_standalone(&self) -> bool {
        self.standalone
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Properties of all commands in this group, one per distinct syntax,
    /// in display order.
    pub fn properties(&self) -> Vec<&PropertyDescriptor> {
        let mut seen = HashSet::new();
        let mut properties: Vec<&PropertyDescriptor> = self
            .commands
            .iter()
            .flat_map(CommandSchema::properties)
            .filter(|p| seen.insert(p.syntax()))
            .collect();
        properties.sort_by(|a, b| a.display_cmp(b));
        properties
    }
}

/// Ordered groups of commands searched for a match.
#[derive(Debug)]
pub struct Registry {
    groups: Vec<CommandGroup>,
    tolerate_duplicate_options: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            tolerate_duplicate_options: true,
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether repeated option literals are accepted. Defaults to `true`.
    pub fn tolerate_duplicate_options(&mut self, tolerate: bool) -> &mut Self {
        self.tolerate_duplicate_options = tolerate;
        self
    }

    pub fn tolerates_duplicate_options(&self) -> bool {
        self.tolerate_duplicate_options
    }

    /// Registers a standalone command in a group of its own.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateGroup`] if a group with the command's
    /// name already exists.
    pub fn add(&mut self, command: CommandSchema) -> Result<&mut Self, SchemaError> {
        self.add_group(CommandGroup::standalone(command))
    }

    /// Registers a group after all existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateGroup`] if the name is taken.
    pub fn add_group(&mut self, group: CommandGroup) -> Result<&mut Self, SchemaError> {
        if self.group(group.name()).is_some() {
            return Err(SchemaError::DuplicateGroup(group.name.clone()));
        }
        self.groups.push(group);
        Ok(self)
    }

    /// The group with the given name, created empty at the end if missing.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::StandaloneGroup`] if the name belongs to a
    /// standalone command.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut CommandGroup, SchemaError> {
        let position = match self.groups.iter().position(|g| g.name == name) {
            Some(position) => position,
            None => {
                self.groups.push(CommandGroup::new(name));
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[position];
        if group.standalone {
            return Err(SchemaError::StandaloneGroup(name.to_string()));
        }
        Ok(group)
    }

    pub fn group(&self, name: &str) -> Option<&CommandGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// All commands in selection order.
    pub fn schemas(&self) -> impl Iterator<Item = &CommandSchema> + '_ {
        self.groups.iter().flat_map(|g| g.commands.iter())
    }

    pub fn find(&self, name: &str) -> Option<&CommandSchema> {
        self.schemas().find(|s| s.name() == name)
    }

    /// Picks the first command, in registration order, that binds the
    /// tokens.
    ///
    /// # Errors
    ///
    /// - [`CliError::DuplicateOptions`] if duplicates are not tolerated and
    ///   an option literal was repeated; checked before any matching.
    /// - [`CliError::NoArguments`] for empty input that no command accepts.
    /// - [`CliError::InvalidUsage`] for other input that no command accepts.
    /// - Value errors raised while binding, see [`CommandSchema::bind`].
    pub fn select(&self, tokens: &Tokens) -> Result<Match<'_>, CliError> {
        if !self.tolerate_duplicate_options && !tokens.duplicated_options().is_empty() {
            let duplicated = tokens.duplicated_options().iter().cloned().collect();
            return Err(CliError::DuplicateOptions(duplicated));
        }
        for schema in self.schemas() {
            if let Some(bindings) = schema.bind(tokens)? {
                debug!(command = %schema.name(), "Selected command");
                return Ok(Match { schema, bindings });
            }
        }
        if tokens.is_empty() {
            Err(CliError::NoArguments)
        } else {
            Err(CliError::InvalidUsage {
                command_line: tokens.original_command_line(),
            })
        }
    }

    /// Tokenizes `args` and selects a command, see [`select`](Self::select).
    pub fn select_args<I, S>(&self, args: I) -> Result<Match<'_>, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select(&Tokens::parse(args))
    }

    /// Selects a command for `args` and runs its handler.
    pub fn run<I, S>(&self, args: I) -> Result<i32, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.select_args(args)?.run())
    }

    /// Completion suggestions for partially typed `args`, sorted and
    /// without duplicates. Never fails: unmatchable input yields no
    /// suggestions.
    pub fn complete<I, S>(&self, args: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = Tokens::parse(args);
        let mut suggestions = BTreeSet::new();
        for schema in self.schemas() {
            schema.complete(&tokens, &mut suggestions);
        }
        debug!(count = suggestions.len(), "Collected completions");
        suggestions
    }

    /// One usage line per command.
    pub fn usage(&self, program: &str) -> Vec<String> {
        self.schemas().map(|s| s.usage(program)).collect()
    }
}

/// A selected command and the values bound from the input.
#[derive(Debug)]
pub struct Match<'r> {
    schema: &'r CommandSchema,
    bindings: Bindings,
}

impl<'r> Match<'r> {
    pub fn schema(&self) -> &'r CommandSchema {
        self.schema
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn into_bindings(self) -> Bindings {
        self.bindings
    }

    /// Runs the command's handler and returns its exit code; `0` when the
    /// command has no handler.
    pub fn run(&self) -> i32 {
        self.schema
            .handler()
            .map_or(0, |handler| handler(&self.bindings))
    }
}
