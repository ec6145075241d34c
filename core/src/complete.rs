//! Shell completion.
//!
//! Completion replays the binding walk of [`CommandSchema::bind`] without
//! binding anything. The last token is treated as the word being typed:
//!
//! - if it cannot be resolved, it is a prefix and every literal alias of the
//!   properties not yet used is offered when it starts with that prefix,
//! - if it is the value of an option with a closed set of values (a choice
//!   or a boolean), the matching values are offered,
//! - if the whole input resolves, every literal alias of the properties not
//!   yet used is offered.
//!
//! A schema that cannot resolve a token before the last one offers nothing.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{CommandSchema, PropertyDescriptor, Registry, ValueParser};
//!
//! let mut registry = Registry::new();
//! registry.add(
//!     CommandSchema::builder("TagList")
//!         .property(PropertyDescriptor::flag("Tag").aliases(["tag", "0"]).mandatory())
//!         .property(PropertyDescriptor::flag("List").aliases(["--list", "-l"]).mandatory())
//!         .property(PropertyDescriptor::scalar("Color", ValueParser::Choice(vec!["always".into(), "never".into()])).alias("--color"))
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let suggestions: Vec<String> = registry.complete(["tag", "--l"]).into_iter().collect();
//! assert_eq!(suggestions, ["--list"]);
//!
//! let suggestions: Vec<String> = registry.complete(["tag", "--color", "al"]).into_iter().collect();
//! assert_eq!(suggestions, ["always"]);
//! ```

use std::collections::BTreeSet;

use tracing::trace;

use crate::bind::{accepts_value, is_assigned};
use crate::property::{PropertyDescriptor, PropertyKind};
use crate::schema::{CommandSchema, Slot};
use crate::token::Tokens;
use crate::value::ValueParser;

impl CommandSchema {
    /// Adds the completions this command offers for `tokens` to
    /// `suggestions`.
    pub fn complete(&self, tokens: &Tokens, suggestions: &mut BTreeSet<String>) {
        let mut remaining: Vec<&PropertyDescriptor> = self.properties().iter().collect();
        let mut cursor = 0;
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let Some(slot) = self.resolve(token, &mut cursor) else {
                if i + 1 == tokens.len() {
                    offer_literals(&remaining, token.text(), suggestions);
                } else {
                    trace!(command = %self.name(), token = %token.text(), "No completion");
                }
                return;
            };
            let property = slot.property();
            if !property.is_vararg() {
                remaining.retain(|p| !std::ptr::eq(*p, property));
            }
            let next = match slot {
                Slot::Option(_) => complete_option(property, tokens, i, suggestions),
                Slot::Positional(_) if property.is_vararg() => Some(
                    (i..tokens.len())
                        .find(|&j| !(property.is_wildcard() || tokens[j].is_value()))
                        .unwrap_or(tokens.len()),
                ),
                Slot::Positional(_) => Some(i + 1),
            };
            match next {
                Some(next) => i = next,
                None => return,
            }
        }
        offer_literals(&remaining, "", suggestions);
    }
}

/// Steps over the option at `index` and its value. Returns `None` when the
/// walk ends here, either because values were offered for the last token or
/// because the input cannot fit the option.
fn complete_option(
    property: &PropertyDescriptor,
    tokens: &Tokens,
    index: usize,
    suggestions: &mut BTreeSet<String>,
) -> Option<usize> {
    let next = tokens.get(index + 1);
    let typing_value = index + 2 == tokens.len();
    match property.kind() {
        PropertyKind::Flag => match next.filter(|t| is_assigned(t)) {
            Some(value) if typing_value => {
                offer_values(&ValueParser::Bool, value.text(), suggestions);
                None
            }
            Some(value) => accepts_value(property, value).then_some(index + 2),
            None => Some(index + 1),
        },
        PropertyKind::Scalar(parser) | PropertyKind::Collection { element: parser, .. } => {
            match next {
                None => {
                    offer_values(parser, "", suggestions);
                    None
                }
                Some(value) if value.is_option() => None,
                Some(value) if typing_value => {
                    offer_values(parser, value.text(), suggestions);
                    None
                }
                Some(value) => accepts_value(property, value).then_some(index + 2),
            }
        }
    }
}

fn offer_literals(
    properties: &[&PropertyDescriptor],
    prefix: &str,
    suggestions: &mut BTreeSet<String>,
) {
    for property in properties {
        for literal in property.literals().filter(|l| l.starts_with(prefix)) {
            suggestions.insert(literal.to_string());
        }
    }
}

fn offer_values(parser: &ValueParser, prefix: &str, suggestions: &mut BTreeSet<String>) {
    let prefix = prefix.to_ascii_lowercase();
    for literal in parser.literals().into_iter().flatten() {
        if literal.to_ascii_lowercase().starts_with(&prefix) {
            suggestions.insert(literal.to_string());
        }
    }
}
