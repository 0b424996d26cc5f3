// Copyright 2025 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Label selector parsing and matching.
//!
//! Accepts the string form used by `kubectl -l` and the API server:
//!
//! ```text
//! environment=production,tier!=frontend
//! partition in (customerA, customerB),!canary
//! kubesphere.io/creator=
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const MAX_NAME_LENGTH: usize = 63;
const MAX_PREFIX_LENGTH: usize = 253;

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The lexer produced a token the grammar does not allow here.
    #[error("found '{found}', expected: {expected}")]
    UnexpectedToken {
        /// Text of the offending token.
        found: String,
        /// What the parser was looking for.
        expected: String,
    },

    /// A key is not a valid qualified name.
    #[error("invalid label key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A value is not a valid label value.
    #[error("invalid label value {value:?}: {reason}")]
    InvalidValue {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// `in` or `notin` with an empty value set.
    #[error("for 'in', 'notin' operators, values set can't be empty")]
    EmptyValueSet,

    /// `>` or `<` with a non-integer operand.
    #[error("for 'Gt', 'Lt' operators, the value must be an integer, got {0:?}")]
    NotAnInteger(String),
}

/// Selector operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    /// `key`
    Exists,
    /// `!key`
    DoesNotExist,
    /// `key=value` or `key==value`
    Equals,
    /// `key!=value`
    NotEquals,
    /// `key in (a,b)`
    In,
    /// `key notin (a,b)`
    NotIn,
    /// `key>n`
    GreaterThan,
    /// `key<n`
    LessThan,
}

/// A single `key op values` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

impl Requirement {
    /// Creates a requirement after validating key, values and arity.
    pub fn new(
        key: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = String>,
    ) -> Result<Self, SelectorError> {
        let key = key.into();
        validate_key(&key)?;
        let values: BTreeSet<String> = values.into_iter().collect();

        match operator {
            Operator::In | Operator::NotIn => {
                if values.is_empty() {
                    return Err(SelectorError::EmptyValueSet);
                }
            }
            Operator::Equals | Operator::NotEquals => {
                if values.len() != 1 {
                    return Err(SelectorError::UnexpectedToken {
                        found: format!("{} values", values.len()),
                        expected: "exactly one value".to_string(),
                    });
                }
            }
            Operator::Exists | Operator::DoesNotExist => {
                if !values.is_empty() {
                    return Err(SelectorError::UnexpectedToken {
                        found: format!("{} values", values.len()),
                        expected: "no values".to_string(),
                    });
                }
            }
            Operator::GreaterThan | Operator::LessThan => {
                if values.len() != 1 {
                    return Err(SelectorError::UnexpectedToken {
                        found: format!("{} values", values.len()),
                        expected: "exactly one value".to_string(),
                    });
                }
                for v in &values {
                    v.parse::<i64>()
                        .map_err(|_| SelectorError::NotAnInteger(v.clone()))?;
                }
            }
        }

        if !matches!(operator, Operator::GreaterThan | Operator::LessThan) {
            for v in &values {
                validate_value(v)?;
            }
        }

        Ok(Self {
            key,
            operator,
            values,
        })
    }

    /// Label key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Values, sorted.
    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// Returns true if `labels` satisfies this requirement.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
            Operator::Equals | Operator::In => {
                value.is_some_and(|v| self.values.contains(v))
            }
            Operator::NotEquals | Operator::NotIn => {
                !value.is_some_and(|v| self.values.contains(v))
            }
            Operator::GreaterThan | Operator::LessThan => {
                let Some(actual) = value.and_then(|v| v.parse::<i64>().ok()) else {
                    return false;
                };
                self.values
                    .iter()
                    .filter_map(|v| v.parse::<i64>().ok())
                    .all(|bound| match self.operator {
                        Operator::GreaterThan => actual > bound,
                        _ => actual < bound,
                    })
            }
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = || self.values.iter().next().map(String::as_str).unwrap_or("");
        match self.operator {
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
            Operator::Equals => write!(f, "{}={}", self.key, first()),
            Operator::NotEquals => write!(f, "{}!={}", self.key, first()),
            Operator::GreaterThan => write!(f, "{}>{}", self.key, first()),
            Operator::LessThan => write!(f, "{}<{}", self.key, first()),
            Operator::In | Operator::NotIn => {
                let op = if self.operator == Operator::In {
                    "in"
                } else {
                    "notin"
                };
                let values: Vec<&str> = self.values.iter().map(String::as_str).collect();
                write!(f, "{} {} ({})", self.key, op, values.join(","))
            }
        }
    }
}

/// A conjunction of requirements.
///
/// The empty selector matches every label set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// The selector that matches everything.
    pub fn everything() -> Self {
        Self::default()
    }

    /// Returns true if this selector places no constraints.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Requirements sorted by key.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns true if every requirement matches `labels`.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses a selector string.
pub fn parse(selector: &str) -> Result<Selector, SelectorError> {
    let tokens = lex(selector);
    let mut parser = Parser { tokens, pos: 0 };
    let mut requirements = parser.parse()?;
    requirements.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(Selector { requirements })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Identifier(String),
    Equals,
    DoubleEquals,
    NotEquals,
    Bang,
    In,
    NotIn,
    GreaterThan,
    LessThan,
    OpenParen,
    CloseParen,
    Comma,
    End,
}

impl Token {
    fn literal(&self) -> String {
        match self {
            Token::Identifier(s) => s.clone(),
            Token::Equals => "=".into(),
            Token::DoubleEquals => "==".into(),
            Token::NotEquals => "!=".into(),
            Token::Bang => "!".into(),
            Token::In => "in".into(),
            Token::NotIn => "notin".into(),
            Token::GreaterThan => ">".into(),
            Token::LessThan => "<".into(),
            Token::OpenParen => "(".into(),
            Token::CloseParen => ")".into(),
            Token::Comma => ",".into(),
            Token::End => "EOS".into(),
        }
    }
}

fn is_special(c: char) -> bool {
    matches!(c, '=' | '!' | '(' | ')' | ',' | '>' | '<')
}

fn lex(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if is_special(c) {
            chars.next();
            let token = match c {
                '=' if chars.peek() == Some(&'=') => {
                    chars.next();
                    Token::DoubleEquals
                }
                '=' => Token::Equals,
                '!' if chars.peek() == Some(&'=') => {
                    chars.next();
                    Token::NotEquals
                }
                '!' => Token::Bang,
                '(' => Token::OpenParen,
                ')' => Token::CloseParen,
                ',' => Token::Comma,
                '>' => Token::GreaterThan,
                _ => Token::LessThan,
            };
            tokens.push(token);
            continue;
        }

        let mut ident = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() || is_special(c) {
                break;
            }
            ident.push(c);
            chars.next();
        }
        tokens.push(match ident.as_str() {
            "in" => Token::In,
            "notin" => Token::NotIn,
            _ => Token::Identifier(ident),
        });
    }

    tokens.push(Token::End);
    tokens
}

static END: Token = Token::End;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&END)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(found: &Token, expected: &str) -> SelectorError {
        SelectorError::UnexpectedToken {
            found: found.literal(),
            expected: expected.to_string(),
        }
    }

    fn parse(&mut self) -> Result<Vec<Requirement>, SelectorError> {
        let mut requirements = Vec::new();
        if *self.peek() == Token::End {
            return Ok(requirements);
        }

        loop {
            requirements.push(self.parse_requirement()?);
            match self.next() {
                Token::End => return Ok(requirements),
                Token::Comma => {
                    if matches!(self.peek(), Token::End) {
                        return Err(Self::unexpected(&Token::End, "identifier after ','"));
                    }
                }
                other => return Err(Self::unexpected(&other, "',' or end of string")),
            }
        }
    }

    fn parse_requirement(&mut self) -> Result<Requirement, SelectorError> {
        let negated = if *self.peek() == Token::Bang {
            self.next();
            true
        } else {
            false
        };

        let key = match self.next() {
            Token::Identifier(key) => key,
            other => return Err(Self::unexpected(&other, "!, identifier")),
        };

        if negated {
            return Requirement::new(key, Operator::DoesNotExist, Vec::new());
        }

        if matches!(self.peek(), Token::End | Token::Comma) {
            return Requirement::new(key, Operator::Exists, Vec::new());
        }

        let operator = match self.next() {
            Token::Equals | Token::DoubleEquals => Operator::Equals,
            Token::NotEquals => Operator::NotEquals,
            Token::In => Operator::In,
            Token::NotIn => Operator::NotIn,
            Token::GreaterThan => Operator::GreaterThan,
            Token::LessThan => Operator::LessThan,
            other => {
                return Err(Self::unexpected(
                    &other,
                    "=, !=, ==, >, <, in, notin",
                ))
            }
        };

        let values = match operator {
            Operator::In | Operator::NotIn => self.parse_value_set()?,
            _ => vec![self.parse_exact_value()?],
        };

        Requirement::new(key, operator, values)
    }

    /// Parses the single value after `=`, `!=`, `>` or `<`.
    ///
    /// A missing value before `,` or the end is the empty string.
    fn parse_exact_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Token::End | Token::Comma => Ok(String::new()),
            Token::Identifier(v) => {
                let v = v.clone();
                self.pos += 1;
                Ok(v)
            }
            other => Err(Self::unexpected(other, "identifier")),
        }
    }

    fn parse_value_set(&mut self) -> Result<Vec<String>, SelectorError> {
        match self.next() {
            Token::OpenParen => {}
            other => return Err(Self::unexpected(&other, "'('")),
        }

        let mut values = Vec::new();
        loop {
            match self.next() {
                Token::CloseParen => return Ok(values),
                Token::Identifier(v) => {
                    values.push(v);
                    match self.next() {
                        Token::Comma => {}
                        Token::CloseParen => return Ok(values),
                        other => return Err(Self::unexpected(&other, "',' or ')'")),
                    }
                }
                // `(a,,b)` and `(,a)` carry an empty value.
                Token::Comma => values.push(String::new()),
                other => return Err(Self::unexpected(&other, "identifier or ')'")),
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name part must be non-empty".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(format!("name part must be no more than {MAX_NAME_LENGTH} characters"));
    }
    let first = name.chars().next().unwrap_or_default();
    let last = name.chars().last().unwrap_or_default();
    if !first.is_ascii_alphanumeric()
        || !last.is_ascii_alphanumeric()
        || !name.chars().all(is_name_char)
    {
        return Err("must consist of alphanumeric characters, '-', '_' or '.', \
                    and must start and end with an alphanumeric character"
            .to_string());
    }
    Ok(())
}

fn validate_dns_subdomain(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("prefix part must be non-empty".to_string());
    }
    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(format!("prefix part must be no more than {MAX_PREFIX_LENGTH} characters"));
    }
    let valid_label = |label: &str| {
        !label.is_empty()
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    };
    if !prefix.split('.').all(valid_label) {
        return Err("prefix part must be a lowercase RFC 1123 subdomain".to_string());
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<(), SelectorError> {
    let invalid = |reason: String| SelectorError::InvalidKey {
        key: key.to_string(),
        reason,
    };

    match key.split_once('/') {
        Some((prefix, name)) => {
            validate_dns_subdomain(prefix).map_err(invalid)?;
            validate_name(name).map_err(invalid)
        }
        None => validate_name(key).map_err(invalid),
    }
}

fn validate_value(value: &str) -> Result<(), SelectorError> {
    if value.is_empty() {
        return Ok(());
    }
    validate_name(value).map_err(|reason| SelectorError::InvalidValue {
        value: value.to_string(),
        reason,
    })
}
