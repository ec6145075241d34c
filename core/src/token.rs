//! Tokenization of a raw argument vector.
//!
//! [`Tokens::parse`] turns the strings received by a program entry point into
//! an immutable, indexable sequence of [`Token`]s. Tokenization never fails:
//! every input string maps to at least one token, except the first literal
//! [`END_OPTIONS`] marker which is consumed silently.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{Tokens, ValueType};
//!
//! let tokens = Tokens::parse(["-abc", "--name=value", "--", "-file"]);
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
//! assert_eq!(texts, ["-a", "-b", "-c", "--name", "value", "-file"]);
//! assert_eq!(tokens[4].value_type(), Some(ValueType::OptionAssignment));
//! assert!(tokens[5].is_end_options());
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Index;

use serde::Serialize;

use crate::error::CliError;

/// Argument that ends option parsing. Every later argument is a value, even
/// when it starts with a hyphen.
pub const END_OPTIONS: &str = "--";

/// Context in which a [`Token::Value`] appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    /// Value given inline with its option (`value` in `--option=value`).
    OptionAssignment,
    /// Value directly following an option (`value` in `--option value`).
    OptionValue,
    /// Value before the first option (`arg` in `arg --option`).
    ValueBeforeOption,
    /// Further value after an option value (`b` in `--option a b`).
    ValueContinued,
    /// Value after the [`END_OPTIONS`] marker.
    ValueEndOption,
}

impl ValueType {
    /// Returns `true` for [`OptionValue`](Self::OptionValue) and
    /// [`OptionAssignment`](Self::OptionAssignment).
    pub fn is_option_value(self) -> bool {
        matches!(self, Self::OptionValue | Self::OptionAssignment)
    }
}

/// A single classified argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// Single-hyphen option such as `-h`.
    ShortOption { text: String, assignment: bool },
    /// Double-hyphen option such as `--help`.
    LongOption { text: String, assignment: bool },
    /// Anything that is not an option.
    Value { text: String, value_type: ValueType },
}

impl Token {
    /// Literal text (`-h`, `--help`, `archive.zip`).
    pub fn text(&self) -> &str {
        match self {
            Self::ShortOption { text, .. }
            | Self::LongOption { text, .. }
            | Self::Value { text, .. } => text,
        }
    }

    /// Option name without leading hyphens (`h` for `-h`, `help` for
    /// `--help`), or `None` for values.
    pub fn option_name(&self) -> Option<&str> {
        match self {
            Self::ShortOption { text, .. } => Some(&text[1..]),
            Self::LongOption { text, .. } => Some(&text[2..]),
            Self::Value { .. } => None,
        }
    }

    pub fn is_option(&self) -> bool {
        !self.is_value()
    }

    pub fn is_short_option(&self) -> bool {
        matches!(self, Self::ShortOption { .. })
    }

    pub fn is_long_option(&self) -> bool {
        matches!(self, Self::LongOption { .. })
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value { .. })
    }

    /// `true` if the option was written with an inline value (`--file=a.txt`).
    pub fn is_assignment(&self) -> bool {
        match self {
            Self::ShortOption { assignment, .. } | Self::LongOption { assignment, .. } => {
                *assignment
            }
            Self::Value { .. } => false,
        }
    }

    /// The value context, or `None` for options.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Value { value_type, .. } => Some(*value_type),
            _ => None,
        }
    }

    /// `true` for values that followed the [`END_OPTIONS`] marker.
    pub fn is_end_options(&self) -> bool {
        self.value_type() == Some(ValueType::ValueEndOption)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Ordered, immutable token sequence for one invocation.
///
/// Built once per call with [`Tokens::parse`]. Navigation that a linked list
/// of arguments would offer ("next option", "next value") is available as
/// index based scans.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    tokens: Vec<Token>,
    original: Vec<String>,
    options: HashMap<String, usize>,
    duplicated: BTreeSet<String>,
}

impl Tokens {
    /// Tokenizes the given arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::Tokens;
    ///
    /// let tokens = Tokens::parse(["-abc", "--help"]);
    /// assert_eq!(tokens.len(), 4);
    /// assert!(tokens.iter().all(|t| t.is_option()));
    /// ```
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let original: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut builder = Builder::default();
        let mut end_options = false;
        for arg in &original {
            if end_options {
                builder.push_value(arg, ValueType::ValueEndOption);
            } else if arg == END_OPTIONS {
                end_options = true;
            } else if arg.starts_with('-') && arg.len() > 1 {
                builder.push_option_like(arg);
            } else {
                builder.push_plain(arg);
            }
        }
        let Builder {
            tokens,
            options,
            duplicated,
            ..
        } = builder;
        tracing::trace!(tokens = ?tokens, "Tokenized arguments");
        Self {
            tokens,
            original,
            options,
            duplicated,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the next option after `index`, skipping values.
    pub fn next_option(&self, index: usize) -> Option<usize> {
        self.scan_after(index, Token::is_option)
    }

    /// Index of the next value after `index`, skipping options.
    pub fn next_value(&self, index: usize) -> Option<usize> {
        self.scan_after(index, Token::is_value)
    }

    fn scan_after(&self, index: usize, accept: impl Fn(&Token) -> bool) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| accept(&self.tokens[i]))
    }

    /// For a value, its own text. For an option, the text of the directly
    /// following value (`foo` for `--key foo`), or `None` when another option
    /// or nothing follows.
    pub fn value_of(&self, index: usize) -> Option<&str> {
        let token = self.tokens.get(index)?;
        if token.is_value() {
            return Some(token.text());
        }
        self.tokens
            .get(index + 1)
            .filter(|next| next.is_value())
            .map(Token::text)
    }

    /// Like [`value_of`](Self::value_of) but collects every consecutive value,
    /// stopping at the next option or at the first end-of-options value.
    pub fn values_of(&self, index: usize) -> Vec<&str> {
        let Some(token) = self.tokens.get(index) else {
            return Vec::new();
        };
        let start = if token.is_value() { index } else { index + 1 };
        self.tokens[start.min(self.tokens.len())..]
            .iter()
            .take_while(|t| t.is_value() && !t.is_end_options())
            .map(Token::text)
            .collect()
    }

    /// First occurrence of the given option literal (`-h`, `--help`).
    pub fn option(&self, literal: &str) -> Option<&Token> {
        self.options.get(literal).map(|&i| &self.tokens[i])
    }

    /// Finds the first present option among synonymous `literals`.
    ///
    /// With `unique` set, finding two of them is an error, which is how a
    /// program rejects `-f --force` given together.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::DuplicateOptionAlias`] when `unique` is `true` and
    /// more than one of `literals` is present.
    pub fn find_option<S: AsRef<str>>(
        &self,
        literals: &[S],
        unique: bool,
    ) -> Result<Option<&Token>, CliError> {
        let mut found: Option<&Token> = None;
        for literal in literals {
            let Some(option) = self.option(literal.as_ref()) else {
                continue;
            };
            match found {
                None if !unique => return Ok(Some(option)),
                None => found = Some(option),
                Some(first) => {
                    return Err(CliError::DuplicateOptionAlias {
                        first: first.text().to_string(),
                        second: option.text().to_string(),
                    });
                }
            }
        }
        Ok(found)
    }

    pub fn last_option(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| t.is_option())
    }

    /// Option literals that occurred more than once, sorted.
    pub fn duplicated_options(&self) -> &BTreeSet<String> {
        &self.duplicated
    }

    /// The arguments exactly as given to [`parse`](Self::parse).
    pub fn original_args(&self) -> &[String] {
        &self.original
    }

    /// The original arguments joined as one command line for diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::Tokens;
    ///
    /// let tokens = Tokens::parse(["-m", "a \"quoted\" msg", "--", "x"]);
    /// assert_eq!(
    ///     tokens.original_command_line(),
    ///     r#"-m "a \"quoted\" msg" -- x"#
    /// );
    /// ```
    pub fn original_command_line(&self) -> String {
        join_command_line(self.original.iter().map(String::as_str))
    }
}

impl Index<usize> for Tokens {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_command_line(self.tokens.iter().map(Token::text)))
    }
}

fn join_command_line<'a>(args: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::new();
    for arg in args {
        if !line.is_empty() {
            line.push(' ');
        }
        let escaped = arg.replace('"', "\\\"");
        if escaped.contains(' ') {
            line.push('"');
            line.push_str(&escaped);
            line.push('"');
        } else {
            line.push_str(&escaped);
        }
    }
    line
}

#[derive(Default)]
struct Builder {
    tokens: Vec<Token>,
    options: HashMap<String, usize>,
    duplicated: BTreeSet<String>,
    seen_option: bool,
}

impl Builder {
    fn push_option_like(&mut self, arg: &str) {
        let (name, assigned) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (arg, None),
        };
        let assignment = assigned.is_some();
        if name.starts_with("--") {
            self.push_option(Token::LongOption {
                text: name.to_string(),
                assignment,
            });
        } else {
            let letters = &name[1..];
            let mut chars = letters.chars();
            match (chars.next(), chars.next()) {
                (None, _) => return self.push_plain(arg),
                // A lone punctuation character is not an option name.
                (Some(c), None) if !c.is_alphanumeric() => return self.push_plain(arg),
                _ => {}
            }
            for c in letters.chars() {
                self.push_option(Token::ShortOption {
                    text: format!("-{c}"),
                    assignment,
                });
            }
        }
        if let Some(value) = assigned {
            self.push_value(value, ValueType::OptionAssignment);
        }
    }

    fn push_plain(&mut self, arg: &str) {
        let value_type = match self.tokens.last() {
            _ if !self.seen_option => ValueType::ValueBeforeOption,
            Some(previous) if previous.is_option() => ValueType::OptionValue,
            _ => ValueType::ValueContinued,
        };
        self.push_value(arg, value_type);
    }

    fn push_value(&mut self, text: &str, value_type: ValueType) {
        self.tokens.push(Token::Value {
            text: text.to_string(),
            value_type,
        });
    }

    fn push_option(&mut self, token: Token) {
        self.seen_option = true;
        let literal = token.text().to_string();
        if self.options.contains_key(&literal) {
            self.duplicated.insert(literal);
        } else {
            self.options.insert(literal, self.tokens.len());
        }
        self.tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &Tokens) -> Vec<&str> {
        tokens.iter().map(Token::text).collect()
    }

    #[test]
    fn test_parse_clustered_short_options() {
        let tokens = Tokens::parse(["-abc"]);

        assert_eq!(texts(&tokens), ["-a", "-b", "-c"]);
        assert!(tokens.iter().all(|t| t.is_short_option() && !t.is_assignment()));
    }

    #[test]
    fn test_parse_long_assignment() {
        let tokens = Tokens::parse(["--name=value"]);

        assert_eq!(
            tokens.as_slice(),
            [
                Token::LongOption {
                    text: "--name".into(),
                    assignment: true
                },
                Token::Value {
                    text: "value".into(),
                    value_type: ValueType::OptionAssignment
                },
            ]
        );
    }

    #[test]
    fn test_parse_mixed_arguments() {
        let tokens = Tokens::parse([
            "-abc",
            "--help",
            "--foo-bar=some",
            "--foo-bar",
            "some",
            "-x=true",
            "--",
            "-file",
        ]);

        assert_eq!(tokens.len(), 11);
        assert_eq!(
            texts(&tokens),
            [
                "-a", "-b", "-c", "--help", "--foo-bar", "some", "--foo-bar", "some", "-x", "true",
                "-file"
            ]
        );
        assert!(tokens[4].is_long_option() && tokens[4].is_assignment());
        assert_eq!(tokens.value_of(4), Some("some"));
        assert!(tokens[6].is_long_option() && !tokens[6].is_assignment());
        assert_eq!(tokens.values_of(6), ["some"]);
        assert!(tokens[8].is_short_option() && tokens[8].is_assignment());
        assert_eq!(tokens[9].value_type(), Some(ValueType::OptionAssignment));
        assert!(tokens[10].is_end_options());
    }

    #[test]
    fn test_parse_value_types() {
        let tokens = Tokens::parse([
            "first", "--option", "value1", "value2", "--key=value", "--", "arg",
        ]);

        let types: Vec<_> = tokens.iter().map(Token::value_type).collect();
        assert_eq!(
            types,
            [
                Some(ValueType::ValueBeforeOption),
                None,
                Some(ValueType::OptionValue),
                Some(ValueType::ValueContinued),
                None,
                Some(ValueType::OptionAssignment),
                Some(ValueType::ValueEndOption),
            ]
        );
        assert_eq!(tokens.values_of(1), ["value1", "value2"]);
        assert_eq!(tokens.values_of(4), ["value"]);
    }

    #[test]
    fn test_parse_edge_cases() {
        let tokens = Tokens::parse(["-", "-=", "=", ",", "--", "-f"]);

        assert_eq!(texts(&tokens), ["-", "-=", "=", ",", "-f"]);
        for token in &tokens.as_slice()[..4] {
            assert_eq!(token.value_type(), Some(ValueType::ValueBeforeOption));
        }
        assert_eq!(tokens[4].value_type(), Some(ValueType::ValueEndOption));
    }

    #[test]
    fn test_second_end_marker_is_value() {
        let tokens = Tokens::parse(["--", "--", "-x"]);

        assert_eq!(texts(&tokens), ["--", "-x"]);
        assert!(tokens.iter().all(Token::is_end_options));
    }

    #[test]
    fn test_cluster_splits_every_character() {
        let tokens = Tokens::parse(["-a.b", "-42", "-.", "-x"]);

        assert_eq!(texts(&tokens), ["-a", "-.", "-b", "-4", "-2", "-.", "-x"]);
        assert!(tokens.as_slice()[..5].iter().all(Token::is_short_option));
        assert_eq!(tokens[5].value_type(), Some(ValueType::OptionValue));
        assert!(tokens[6].is_short_option());
    }

    #[test]
    fn test_bare_long_prefix_with_assignment() {
        let tokens = Tokens::parse(["--=x"]);

        assert_eq!(texts(&tokens), ["--", "x"]);
        assert!(tokens[0].is_long_option());
        assert!(tokens[0].is_assignment());
        assert_eq!(tokens[1].value_type(), Some(ValueType::OptionAssignment));
    }

    #[test]
    fn test_option_names_and_navigation() {
        let tokens = Tokens::parse(["-h", "a", "b", "--help"]);

        assert_eq!(tokens[0].option_name(), Some("h"));
        assert_eq!(tokens[3].option_name(), Some("help"));
        assert_eq!(tokens[1].option_name(), None);
        assert_eq!(tokens.next_option(0), Some(3));
        assert_eq!(tokens.next_value(0), Some(1));
        assert_eq!(tokens.next_value(2), None);
        assert_eq!(tokens.value_of(3), None);
        assert_eq!(tokens.last_option().map(Token::text), Some("--help"));
    }

    #[test]
    fn test_duplicated_options() {
        let tokens = Tokens::parse(["--key", "k1", "--key", "k2", "-vv"]);

        let duplicated: Vec<_> = tokens.duplicated_options().iter().cloned().collect();
        assert_eq!(duplicated, ["--key", "-v"]);
        assert_eq!(tokens.option("--key").and_then(|t| t.option_name()), Some("key"));
    }

    #[test]
    fn test_find_option_unique() {
        let tokens = Tokens::parse(["-f", "--force"]);

        let first = tokens.find_option(&["--force", "-f"], false).unwrap();
        assert_eq!(first.map(Token::text), Some("--force"));

        let err = tokens.find_option(&["--force", "-f"], true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate options '--force' and '-f'"
        );
        assert!(tokens.find_option(&["--quiet"], true).unwrap().is_none());
    }

    #[test]
    fn test_empty_input() {
        let tokens = Tokens::parse(Vec::<String>::new());

        assert!(tokens.is_empty());
        assert!(tokens.first().is_none());
        assert_eq!(tokens.original_command_line(), "");
    }
}
