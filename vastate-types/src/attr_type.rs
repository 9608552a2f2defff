//! The attribute type lattice.
//!
//! Every declared field has exactly one [`AttrType`]. Types print in a compact
//! form (`list<string>`, `object{id:int64,name:string}`) that also parses back,
//! which lets configuration files spell element types as plain strings.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Declared shape of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttrType {
    String,
    Int64,
    Float64,
    Bool,
    List(Box<AttrType>),
    Set(Box<AttrType>),
    Map(Box<AttrType>),
    /// Named fields, ordered by name.
    Object(BTreeMap<String, AttrType>),
}

impl AttrType {
    /// Shorthand for `list<element>`.
    pub fn list(element: AttrType) -> Self {
        Self::List(Box::new(element))
    }

    /// Shorthand for `set<element>`.
    pub fn set(element: AttrType) -> Self {
        Self::Set(Box::new(element))
    }

    /// Shorthand for `map<element>`.
    pub fn map(element: AttrType) -> Self {
        Self::Map(Box::new(element))
    }

    /// Builds an object type from `(name, type)` pairs.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, AttrType)>,
        K: Into<String>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true for string, int64, float64 and bool.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::String | Self::Int64 | Self::Float64 | Self::Bool)
    }

    /// Element type of a list, set or map.
    #[must_use]
    pub fn element_type(&self) -> Option<&AttrType> {
        match self {
            Self::List(e) | Self::Set(e) | Self::Map(e) => Some(e),
            _ => None,
        }
    }

    /// Field types of an object.
    #[must_use]
    pub fn object_fields(&self) -> Option<&BTreeMap<String, AttrType>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Short name of the outermost type constructor.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(e) => write!(f, "list<{e}>"),
            Self::Set(e) => write!(f, "set<{e}>"),
            Self::Map(e) => write!(f, "map<{e}>"),
            Self::Object(fields) => {
                f.write_str("object{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}:{ty}")?;
                }
                f.write_str("}")
            }
            scalar => f.write_str(scalar.kind_name()),
        }
    }
}

impl FromStr for AttrType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = TypeParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(Error::TypeParse(format!(
                "unexpected trailing input {:?} in {s:?}",
                &s[parser.pos..]
            )));
        }
        Ok(ty)
    }
}

impl TryFrom<String> for AttrType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AttrType> for String {
    fn from(ty: AttrType) -> Self {
        ty.to_string()
    }
}

/// Recursive-descent parser for the printed type form.
struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn ident(&mut self) -> &'a str {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_' || c == '-') {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    fn expect(&mut self, want: char) -> Result<()> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == want => {
                self.pos += c.len_utf8();
                Ok(())
            }
            other => Err(Error::TypeParse(format!(
                "expected {want:?} at offset {} in {:?}, found {:?}",
                self.pos, self.input, other
            ))),
        }
    }

    fn parse_type(&mut self) -> Result<AttrType> {
        let name = self.ident();
        match name {
            "string" => Ok(AttrType::String),
            "int64" => Ok(AttrType::Int64),
            "float64" => Ok(AttrType::Float64),
            "bool" => Ok(AttrType::Bool),
            "list" | "set" | "map" => {
                self.expect('<')?;
                let element = self.parse_type()?;
                self.expect('>')?;
                Ok(match name {
                    "list" => AttrType::list(element),
                    "set" => AttrType::set(element),
                    _ => AttrType::map(element),
                })
            }
            "object" => self.parse_object_fields(),
            "" => Err(Error::TypeParse(format!(
                "expected a type name at offset {} in {:?}",
                self.pos, self.input
            ))),
            other => Err(Error::TypeParse(format!("unknown type {other:?}"))),
        }
    }

    fn parse_object_fields(&mut self) -> Result<AttrType> {
        self.expect('{')?;
        let mut fields = BTreeMap::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(AttrType::Object(fields));
        }
        loop {
            let field = self.ident();
            if field.is_empty() {
                return Err(Error::TypeParse(format!(
                    "expected a field name at offset {} in {:?}",
                    self.pos, self.input
                )));
            }
            self.expect(':')?;
            let ty = self.parse_type()?;
            if fields.insert(field.to_string(), ty).is_some() {
                return Err(Error::TypeParse(format!("duplicate object field {field:?}")));
            }
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(AttrType::Object(fields));
                }
                other => {
                    return Err(Error::TypeParse(format!(
                        "expected ',' or '}}' at offset {} in {:?}, found {:?}",
                        self.pos, self.input, other
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_object_prints_sorted_fields() {
        let ty = AttrType::list(AttrType::object([
            ("name", AttrType::String),
            ("id", AttrType::Int64),
        ]));
        assert_eq!(ty.to_string(), "list<object{id:int64,name:string}>");
    }

    #[test]
    fn parse_tolerates_whitespace() {
        let ty: AttrType = " map< set<string> > ".parse().unwrap();
        assert_eq!(ty, AttrType::map(AttrType::set(AttrType::String)));
    }

    #[test]
    fn parse_rejects_duplicate_fields() {
        assert!("object{a:int64,a:string}".parse::<AttrType>().is_err());
    }

    #[test]
    fn parse_rejects_trailing_input() {
        assert!("string>".parse::<AttrType>().is_err());
    }
}
