use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Declared type of a field or supertype, as supplied by a type provider.
///
/// The textual form mirrors source syntax: `java.util.List<com.acme.Item>`,
/// `int[]`, `? extends Number`. A leading `!` marks a reference the provider
/// could not resolve, e.g. `!com.acme.Missing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeExpr {
    /// Nominal type usage or generic parameter name, with type arguments.
    Named { name: String, args: Vec<TypeExpr> },
    /// Native array of the element type.
    Array(Box<TypeExpr>),
    /// Wildcard argument with an optional bound.
    Wildcard {
        kind: WildcardKind,
        bound: Option<Box<TypeExpr>>,
    },
    /// Symbol the provider failed to resolve; keeps the source text.
    Unresolved(String),
}

/// Direction of a wildcard bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WildcardKind {
    /// `?` or `? extends X`.
    Extends,
    /// `? super X`.
    Super,
}

impl TypeExpr {
    /// Nominal usage without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Nominal usage with type arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args,
        }
    }

    /// Native array of `element`.
    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(element))
    }

    /// Parse the textual form.
    pub fn parse(input: &str) -> Result<Self, ConvertError> {
        let mut parser = Parser::new(input);
        let expr = parser.expr()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    /// The nominal name, if this is a `Named` usage.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeExpr::Array(element) => write!(f, "{}[]", element),
            TypeExpr::Wildcard { kind, bound } => match (kind, bound) {
                (_, None) => write!(f, "?"),
                (WildcardKind::Extends, Some(b)) => write!(f, "? extends {}", b),
                (WildcardKind::Super, Some(b)) => write!(f, "? super {}", b),
            },
            TypeExpr::Unresolved(text) => write!(f, "!{}", text),
        }
    }
}

impl FromStr for TypeExpr {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeExpr::parse(s)
    }
}

impl TryFrom<String> for TypeExpr {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeExpr::parse(&value)
    }
}

impl From<TypeExpr> for String {
    fn from(value: TypeExpr) -> Self {
        value.to_string()
    }
}

/// Recursive-descent parser over the textual form.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn expr(&mut self) -> Result<TypeExpr, ConvertError> {
        self.skip_ws();
        let mut expr = if self.eat('!') {
            let start = self.pos;
            self.base()?;
            TypeExpr::Unresolved(self.input[start..self.pos].trim().to_string())
        } else {
            self.base()?
        };

        loop {
            self.skip_ws();
            if self.rest().starts_with("[]") {
                self.pos += 2;
                expr = TypeExpr::array(expr);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn base(&mut self) -> Result<TypeExpr, ConvertError> {
        self.skip_ws();
        if self.eat('?') {
            self.skip_ws();
            let kind = if self.eat_keyword("extends") {
                WildcardKind::Extends
            } else if self.eat_keyword("super") {
                WildcardKind::Super
            } else {
                return Ok(TypeExpr::Wildcard {
                    kind: WildcardKind::Extends,
                    bound: None,
                });
            };
            let bound = self.expr()?;
            return Ok(TypeExpr::Wildcard {
                kind,
                bound: Some(Box::new(bound)),
            });
        }

        let name = self.ident()?;
        let mut args = Vec::new();
        self.skip_ws();
        if self.eat('<') {
            loop {
                args.push(self.expr()?);
                self.skip_ws();
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }

        Ok(TypeExpr::Named { name, args })
    }

    fn ident(&mut self) -> Result<String, ConvertError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let name = &self.input[start..self.pos];
        if name.is_empty() || name.starts_with('.') || name.ends_with('.') {
            return Err(self.error("expected a type name"));
        }
        Ok(name.to_string())
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        if let Some(after) = rest.strip_prefix(keyword) {
            if after.starts_with(char::is_whitespace) {
                self.pos += keyword.len();
                return true;
            }
        }
        false
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error(&self, message: &str) -> ConvertError {
        ConvertError::TypeExpr {
            input: self.input.to_string(),
            message: format!("{} at offset {}", message, self.pos),
        }
    }
}
