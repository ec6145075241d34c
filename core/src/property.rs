//! Property descriptors: the declared fields of a command.
//!
//! A [`PropertyDescriptor`] names one field of a command, lists the aliases
//! it is recognized by, and carries a [`PropertyKind`] that decides how raw
//! text is turned into a value. Aliases come in three shapes:
//!
//! - option literals such as `--mode` or `-m`,
//! - a single digit positional index such as `0`,
//! - the [`ALIAS_WILDCARD`] marker, accepting any token at its position.
//!
//! A non-option alias that is neither an index nor the wildcard is a keyword
//! literal (e.g. `tag` in `git tag`).
//!
//! # Examples
//!
//! ```
//! use argbind_core::{PropertyCategory, PropertyDescriptor, ValueParser};
//!
//! let mode = PropertyDescriptor::scalar("Mode", ValueParser::Text)
//!     .aliases(["--mode", "-m"])
//!     .mandatory();
//! assert!(mode.is_option());
//! assert_eq!(mode.syntax(), "--mode|-m");
//! assert_eq!(mode.usage(), "--mode|-m <mode>");
//! assert_eq!(mode.category(), PropertyCategory::MandatoryOption);
//!
//! let value = PropertyDescriptor::scalar("Value", ValueParser::Integer).alias("0");
//! assert_eq!(value.index(), Some(0));
//! assert_eq!(value.usage(), "[<value>]");
//! ```

use std::cmp::Ordering;

use serde::Serialize;

use crate::value::ValueParser;

/// Alias marking a positional property that accepts any token, including
/// option-shaped text.
pub const ALIAS_WILDCARD: &str = "*";

/// How a property turns argument text into a bound value.
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// Boolean satisfied by mere presence.
    Flag,
    /// Single value, replaced on every occurrence.
    Scalar(ValueParser),
    /// Accumulates values. `comma_split` controls whether each plain value is
    /// split on commas; when unset, option-bound collections split and
    /// positional ones do not.
    Collection {
        element: ValueParser,
        comma_split: Option<bool>,
    },
}

/// Help grouping of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    MandatoryOption,
    AdditionalOption,
    Value,
}

/// Declared field of a command.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    aliases: Vec<String>,
    mandatory: bool,
    kind: PropertyKind,
    help: Option<String>,
}

impl PropertyDescriptor {
    /// Creates a property of the given kind without aliases.
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            mandatory: false,
            kind,
            help: None,
        }
    }

    /// Creates a boolean flag property.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Flag)
    }

    /// Creates a single-valued property.
    pub fn scalar(name: impl Into<String>, parser: ValueParser) -> Self {
        Self::new(name, PropertyKind::Scalar(parser))
    }

    /// Creates a multi-valued (vararg) property.
    pub fn collection(name: impl Into<String>, element: ValueParser) -> Self {
        Self::new(
            name,
            PropertyKind::Collection {
                element,
                comma_split: None,
            },
        )
    }

    /// Appends an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Appends several aliases in order.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Marks the property as required for a command to match.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Sets the mandatory flag explicitly.
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Overrides comma splitting for a collection. Has no effect on other
    /// kinds.
    pub fn comma_split(mut self, split: bool) -> Self {
        if let PropertyKind::Collection { comma_split, .. } = &mut self.kind {
            *comma_split = Some(split);
        }
        self
    }

    /// Attaches help text for usage rendering.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases_list(&self) -> &[String] {
        &self.aliases
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.kind, PropertyKind::Flag)
    }

    /// `true` for collections, which accept a variable number of values.
    pub fn is_vararg(&self) -> bool {
        matches!(self.kind, PropertyKind::Collection { .. })
    }

    pub fn is_wildcard(&self) -> bool {
        self.aliases.iter().any(|a| a == ALIAS_WILDCARD)
    }

    /// Positional index declared by a single digit alias.
    pub fn index(&self) -> Option<usize> {
        self.indices().next()
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.aliases
            .iter()
            .filter(|a| is_index(a))
            .filter_map(|a| a.parse().ok())
    }

    /// `true` if any alias is an option literal.
    pub fn is_option(&self) -> bool {
        self.literals().any(|a| a.starts_with('-'))
    }

    /// `true` for a user supplied value: neither an option nor a keyword.
    pub fn is_value(&self) -> bool {
        self.literals().next().is_none()
    }

    /// `true` for a static command keyword such as `tag` in `git tag`.
    pub fn is_keyword(&self) -> bool {
        !self.is_option() && self.mandatory && !self.is_value() && self.is_flag()
    }

    /// Aliases that are neither positional indices nor the wildcard.
    pub fn literals(&self) -> impl Iterator<Item = &str> + '_ {
        self.aliases
            .iter()
            .map(String::as_str)
            .filter(|a| !is_index(a) && *a != ALIAS_WILDCARD)
    }

    /// Whether a positional token with the given text fits this property.
    /// Properties with keyword literals only accept one of them.
    pub(crate) fn accepts_positional(&self, text: &str) -> bool {
        let mut literals = self.literals().peekable();
        literals.peek().is_none() || literals.any(|a| a == text)
    }

    /// Whether plain values bound to this collection are split on commas.
    pub fn splits_on_comma(&self) -> bool {
        match self.kind {
            PropertyKind::Collection { comma_split, .. } => {
                comma_split.unwrap_or_else(|| self.is_option())
            }
            _ => false,
        }
    }

    /// Parser of a scalar or of a collection's elements. `None` for flags.
    pub fn value_parser(&self) -> Option<&ValueParser> {
        match &self.kind {
            PropertyKind::Flag => None,
            PropertyKind::Scalar(parser) => Some(parser),
            PropertyKind::Collection { element, .. } => Some(element),
        }
    }

    /// Plain syntax for help, e.g. `--locale|-l`.
    pub fn syntax(&self) -> String {
        let names: Vec<&str> = self
            .aliases
            .iter()
            .map(String::as_str)
            .filter(|a| !is_index(a))
            .collect();
        if names.is_empty() {
            uncapitalize(&self.name)
        } else {
            names.join("|")
        }
    }

    /// Usage fragment, e.g. `[--locale|-l <locale>]`.
    pub fn usage(&self) -> String {
        let mut usage = String::new();
        let value = self.is_value();
        if !self.mandatory {
            usage.push('[');
        }
        if value {
            usage.push('<');
        }
        usage.push_str(&self.syntax());
        if value {
            usage.push('>');
        }
        if self.is_option() && !self.is_flag() {
            let value_name = self
                .default_name()
                .and_then(|name| name.strip_prefix("--"))
                .unwrap_or("value");
            usage.push_str(" <");
            usage.push_str(value_name);
            usage.push('>');
            if self.is_vararg() {
                usage.push_str("...");
            }
        }
        if !self.mandatory {
            usage.push(']');
        }
        usage
    }

    /// The first long alias, otherwise the last named alias.
    fn default_name(&self) -> Option<&str> {
        let mut named = self.aliases.iter().filter(|a| !is_index(a));
        let first_long = named.clone().find(|a| a.starts_with("--"));
        first_long.or_else(|| named.next_back()).map(String::as_str)
    }

    pub fn category(&self) -> PropertyCategory {
        match (self.is_option(), self.mandatory) {
            (true, true) => PropertyCategory::MandatoryOption,
            (true, false) => PropertyCategory::AdditionalOption,
            (false, _) => PropertyCategory::Value,
        }
    }

    fn rank(&self) -> u8 {
        if self.is_keyword() {
            0
        } else if self.is_option() {
            if self.mandatory { 1 } else { 2 }
        } else {
            3
        }
    }

    /// Display and priority order: keywords, mandatory options, optional
    /// options, then positional values; ties by index, then by syntax.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.index().cmp(&other.index()))
            .then_with(|| self.syntax().cmp(&other.syntax()))
    }
}

/// `true` for a single digit positional alias.
pub fn is_index(alias: &str) -> bool {
    alias.len() == 1 && alias.as_bytes()[0].is_ascii_digit()
}

fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
