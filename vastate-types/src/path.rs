//! Attribute paths (`spec.items[2].name`) and their resolution against a
//! tree of typed values.
//!
//! A path is a sequence of segments separated by `.`; each segment is a name
//! optionally followed by one or more bracketed indices. Names address object
//! attributes (or the top-level value map), indices address list and set
//! elements by position.

use crate::{AttrValue, Error, Result, ValueState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error as ThisError;

/// Error type for path parsing.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("empty path")]
    Empty,
    #[error("empty name in path at position {0}")]
    EmptyKey(usize),
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    #[error("invalid index at position {0}: {1:?}")]
    InvalidIndex(usize, String),
    #[error("unexpected character {0:?} at position {1}")]
    UnexpectedChar(char, usize),
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Attribute name.
    Key(String),
    /// Position in a list or set.
    Index(usize),
}

/// A parsed attribute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AttrPath {
    segments: Vec<PathSegment>,
}

impl AttrPath {
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Appends a name segment (builder pattern).
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Appends an index segment (builder pattern).
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The top-level attribute name, if the path starts with one.
    pub fn first_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Key(k)) => Some(k),
            _ => None,
        }
    }

    /// True when the path is a single top-level name.
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1 && self.first_key().is_some()
    }

    /// Dotted key with indices dropped (`spec.items[2].name` → `spec.items.name`),
    /// the form used by schema metadata.
    pub fn schema_key(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Key(k) => Some(k.as_str()),
                PathSegment::Index(_) => None,
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn prefix(&self, len: usize) -> AttrPath {
        AttrPath::from_segments(self.segments[..len].to_vec())
    }
}

impl FromStr for AttrPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }

        let mut segments = Vec::new();
        let mut offset = 0;
        for (part_no, part) in s.split('.').enumerate() {
            let name_end = part.find('[').unwrap_or(part.len());
            let name = &part[..name_end];
            if name.is_empty() && (part_no > 0 || name_end == part.len()) {
                return Err(PathParseError::EmptyKey(offset));
            }
            if let Some(pos) = name.find(']') {
                return Err(PathParseError::UnexpectedChar(']', offset + pos));
            }
            if !name.is_empty() {
                segments.push(PathSegment::Key(name.to_string()));
            }

            let mut rest = &part[name_end..];
            let mut pos = offset + name_end;
            while !rest.is_empty() {
                if !rest.starts_with('[') {
                    let c = rest.chars().next().unwrap_or_default();
                    return Err(PathParseError::UnexpectedChar(c, pos));
                }
                let close = rest
                    .find(']')
                    .ok_or(PathParseError::UnclosedBracket(pos))?;
                let digits = &rest[1..close];
                let idx = digits
                    .parse::<usize>()
                    .map_err(|_| PathParseError::InvalidIndex(pos + 1, digits.to_string()))?;
                segments.push(PathSegment::Index(idx));
                rest = &rest[close + 1..];
                pos += close + 1;
            }

            offset += part.len() + 1;
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Key(k) if i == 0 => f.write_str(k)?,
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for AttrPath {
    /// Infallible shorthand for a single top-level name.
    fn from(key: &str) -> Self {
        Self::default().key(key)
    }
}

/// Walks `path` through `root` and returns the addressed value.
pub fn resolve<'a>(root: &'a BTreeMap<String, AttrValue>, path: &AttrPath) -> Result<&'a AttrValue> {
    let (first, rest) = split_root(path)?;
    let mut current = root
        .get(first)
        .ok_or_else(|| resolution_error(path, 1, "key not found"))?;
    for (i, seg) in rest.iter().enumerate() {
        current = step(current, seg).map_err(|reason| resolution_error(path, i + 2, &reason))?;
    }
    Ok(current)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(
    root: &'a mut BTreeMap<String, AttrValue>,
    path: &AttrPath,
) -> Result<&'a mut AttrValue> {
    let (first, rest) = split_root(path)?;
    let mut current = root
        .get_mut(first)
        .ok_or_else(|| resolution_error(path, 1, "key not found"))?;
    for (i, seg) in rest.iter().enumerate() {
        current =
            step_mut(current, seg).map_err(|reason| resolution_error(path, i + 2, &reason))?;
    }
    Ok(current)
}

fn split_root(path: &AttrPath) -> Result<(&str, &[PathSegment])> {
    match path.segments.split_first() {
        Some((PathSegment::Key(k), rest)) => Ok((k.as_str(), rest)),
        Some((PathSegment::Index(_), _)) => Err(resolution_error(
            path,
            1,
            "top-level values are addressed by name",
        )),
        None => Err(Error::PathResolution {
            path: String::new(),
            reason: "empty path".into(),
        }),
    }
}

fn step<'a>(current: &'a AttrValue, seg: &PathSegment) -> std::result::Result<&'a AttrValue, String> {
    let kind = current.kind_name();
    match seg {
        PathSegment::Key(k) => match current {
            AttrValue::Object {
                attributes: ValueState::Known(attrs),
                ..
            } => attrs.get(k).ok_or_else(|| "key not found".to_string()),
            AttrValue::Object { .. } => Err("object is null or unknown".into()),
            _ => Err(format!("cannot look up a name in a {kind}")),
        },
        PathSegment::Index(idx) => match current {
            AttrValue::List {
                items: ValueState::Known(items),
                ..
            }
            | AttrValue::Set {
                items: ValueState::Known(items),
                ..
            } => items
                .get(*idx)
                .ok_or_else(|| format!("index out of bounds (len {})", items.len())),
            AttrValue::List { .. } | AttrValue::Set { .. } => Err(format!("{kind} is null or unknown")),
            _ => Err(format!("a {kind} does not support indexing")),
        },
    }
}

fn step_mut<'a>(
    current: &'a mut AttrValue,
    seg: &PathSegment,
) -> std::result::Result<&'a mut AttrValue, String> {
    let kind = current.kind_name();
    match seg {
        PathSegment::Key(k) => match current {
            AttrValue::Object {
                attributes: ValueState::Known(attrs),
                ..
            } => attrs.get_mut(k).ok_or_else(|| "key not found".to_string()),
            AttrValue::Object { .. } => Err("object is null or unknown".into()),
            _ => Err(format!("cannot look up a name in a {kind}")),
        },
        PathSegment::Index(idx) => match current {
            AttrValue::List {
                items: ValueState::Known(items),
                ..
            }
            | AttrValue::Set {
                items: ValueState::Known(items),
                ..
            } => {
                let len = items.len();
                items
                    .get_mut(*idx)
                    .ok_or_else(|| format!("index out of bounds (len {len})"))
            }
            AttrValue::List { .. } | AttrValue::Set { .. } => Err(format!("{kind} is null or unknown")),
            _ => Err(format!("a {kind} does not support indexing")),
        },
    }
}

fn resolution_error(path: &AttrPath, upto: usize, reason: &str) -> Error {
    Error::PathResolution {
        path: path.prefix(upto).to_string(),
        reason: reason.to_string(),
    }
}
