//! Serde data model of a program's commands.
//!
//! A [`ProgramDefinition`] lists standalone commands and command groups the
//! way a program would register them in code. Files are YAML (`.yaml`,
//! `.yml`) or JSON (`.json`), picked by extension.
//!
//! # Example YAML
//!
//! ```yaml
//! program: git
//! description: Git tag emulation
//! tolerate_duplicate_options: true
//! commands:
//!   - name: version
//!     properties:
//!       - { name: Version, aliases: ["--version", "-v"], kind: flag, mandatory: true }
//! groups:
//!   - name: tag
//!     commands:
//!       - name: tag-list
//!         properties:
//!           - { name: Tag, aliases: ["tag", "0"], kind: flag, mandatory: true }
//!           - { name: List, aliases: ["--list", "-l"], kind: flag, mandatory: true }
//!           - { name: Color, aliases: ["--color"], value: { choice: [always, never, auto] } }
//!           - { name: Sort, aliases: ["--sort"], kind: list, comma_split: true }
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use argbind_core::{CommandGroup, CommandSchema, PropertyDescriptor, Registry, ValueParser};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DefinitionError, Result};

/// File formats a definition can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(DefinitionError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// All commands of one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDefinition {
    /// Program name used in usage lines.
    pub program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether an option literal may be repeated in one invocation.
    #[serde(default = "default_true")]
    pub tolerate_duplicate_options: bool,
    /// Standalone commands, each registered in a group of its own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDefinition>,
    /// Command groups, registered after the standalone commands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupDefinition>,
}

/// Named, ordered list of commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    pub commands: Vec<CommandDefinition>,
}

/// One command and its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub properties: Vec<PropertyDefinition>,
}

/// One declared property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub aliases: Vec<String>,
    #[serde(default)]
    pub kind: PropertyKindDefinition,
    #[serde(default)]
    pub mandatory: bool,
    /// Value type of a scalar or of a list's elements.
    #[serde(default)]
    pub value: ValueDefinition,
    /// Comma splitting of list values. Only valid for lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comma_split: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKindDefinition {
    Flag,
    #[default]
    Scalar,
    List,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDefinition {
    #[default]
    Text,
    Integer,
    Float,
    Bool,
    Choice(Vec<String>),
}

fn default_true() -> bool {
    true
}

impl ValueDefinition {
    pub fn parser(&self) -> ValueParser {
        match self {
            Self::Text => ValueParser::Text,
            Self::Integer => ValueParser::Integer,
            Self::Float => ValueParser::Float,
            Self::Bool => ValueParser::Bool,
            Self::Choice(choices) => ValueParser::Choice(choices.clone()),
        }
    }
}

impl PropertyDefinition {
    /// Builds the core descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidProperty`] when a flag declares a
    /// value type or a non-list declares comma splitting.
    pub fn descriptor(&self, command: &str) -> Result<PropertyDescriptor> {
        let invalid = |reason: &str| DefinitionError::InvalidProperty {
            command: command.to_string(),
            property: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.comma_split.is_some() && self.kind != PropertyKindDefinition::List {
            return Err(invalid("comma_split is only allowed for lists"));
        }
        let descriptor = match self.kind {
            PropertyKindDefinition::Flag => {
                if self.value != ValueDefinition::Text {
                    return Err(invalid("flags do not take a value type"));
                }
                PropertyDescriptor::flag(&self.name)
            }
            PropertyKindDefinition::Scalar => {
                PropertyDescriptor::scalar(&self.name, self.value.parser())
            }
            PropertyKindDefinition::List => {
                let list = PropertyDescriptor::collection(&self.name, self.value.parser());
                match self.comma_split {
                    Some(split) => list.comma_split(split),
                    None => list,
                }
            }
        };
        let descriptor = descriptor
            .aliases(self.aliases.iter().cloned())
            .with_mandatory(self.mandatory);
        Ok(match &self.help {
            Some(help) => descriptor.with_help(help),
            None => descriptor,
        })
    }
}

impl CommandDefinition {
    /// Builds and validates the command schema.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidProperty`] or a wrapped
    /// [`SchemaError`](argbind_core::SchemaError).
    pub fn build(&self) -> Result<CommandSchema> {
        let properties = self
            .properties
            .iter()
            .map(|p| p.descriptor(&self.name))
            .collect::<Result<Vec<_>>>()?;
        let builder = CommandSchema::builder(&self.name).properties(properties);
        let builder = match &self.help {
            Some(help) => builder.help(help),
            None => builder,
        };
        Ok(builder.build()?)
    }
}

impl GroupDefinition {
    /// Builds every command of the group in order.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`CommandDefinition::build`].
    pub fn build(&self) -> Result<CommandGroup> {
        self.commands
            .iter()
            .try_fold(CommandGroup::new(&self.name), |group, command| {
                Ok(group.command(command.build()?))
            })
    }
}

impl ProgramDefinition {
    /// Loads a definition file, picking the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](DefinitionError::UnsupportedFormat) for
    /// unknown extensions, [`IoError`](DefinitionError::IoError) if the file
    /// cannot be read, or a parse error of the format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let definition = match format {
            Format::Yaml => serde_yaml::from_reader(reader)?,
            Format::Json => serde_json::from_reader(reader)?,
        };
        debug!(path = %path.display(), "Loaded definition");
        Ok(definition)
    }

    /// Saves the definition, picking the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](DefinitionError::UnsupportedFormat) for
    /// unknown extensions, [`IoError`](DefinitionError::IoError) if the file
    /// cannot be written, or a serialization error of the format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            Format::Yaml => serde_yaml::to_writer(writer, self)?,
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of commands across standalone commands and groups.
    pub fn command_count(&self) -> usize {
        self.commands.len() + self.groups.iter().map(|g| g.commands.len()).sum::<usize>()
    }

    /// Builds a registry: standalone commands first, then groups, each in
    /// file order.
    ///
    /// # Errors
    ///
    /// Returns the first invalid property or structural error.
    pub fn into_registry(self) -> Result<Registry> {
        let mut registry = Registry::new();
        registry.tolerate_duplicate_options(self.tolerate_duplicate_options);
        for command in &self.commands {
            registry.add(command.build()?)?;
        }
        for group in &self.groups {
            registry.add_group(group.build()?)?;
        }
        debug!(program = %self.program, commands = self.command_count(), "Built registry");
        Ok(registry)
    }
}
