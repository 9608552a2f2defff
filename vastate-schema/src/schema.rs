//! Declarative schema description.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vastate_types::AttrType;

/// Describes one remote entity kind (a view, a quota, a user ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeSchema>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute (builder pattern).
    pub fn attribute(mut self, name: impl Into<String>, attr: AttributeSchema) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Shape of an attribute. Scalar and collection shapes carry an element
/// type; nested shapes carry child attribute declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeShape {
    String,
    Int64,
    Float64,
    Bool,
    List {
        element: AttrType,
    },
    Set {
        element: AttrType,
    },
    Map {
        element: AttrType,
    },
    SingleNested {
        #[serde(default)]
        attributes: BTreeMap<String, AttributeSchema>,
    },
    ListNested {
        #[serde(default)]
        attributes: BTreeMap<String, AttributeSchema>,
    },
    SetNested {
        #[serde(default)]
        attributes: BTreeMap<String, AttributeSchema>,
    },
    MapNested {
        #[serde(default)]
        attributes: BTreeMap<String, AttributeSchema>,
    },
}

impl AttributeShape {
    /// Child declarations of a nested shape.
    #[must_use]
    pub fn nested_attributes(&self) -> Option<&BTreeMap<String, AttributeSchema>> {
        match self {
            Self::SingleNested { attributes }
            | Self::ListNested { attributes }
            | Self::SetNested { attributes }
            | Self::MapNested { attributes } => Some(attributes),
            _ => None,
        }
    }

    /// Short label used when rendering schemas.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::String => "string".into(),
            Self::Int64 => "int64".into(),
            Self::Float64 => "float64".into(),
            Self::Bool => "bool".into(),
            Self::List { element } => format!("list<{element}>"),
            Self::Set { element } => format!("set<{element}>"),
            Self::Map { element } => format!("map<{element}>"),
            Self::SingleNested { .. } => "object".into(),
            Self::ListNested { .. } => "list<object>".into(),
            Self::SetNested { .. } => "set<object>".into(),
            Self::MapNested { .. } => "map<object>".into(),
        }
    }
}

/// One declared attribute: its shape plus the declared classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    #[serde(flatten)]
    pub shape: AttributeShape,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub write_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AttributeSchema {
    pub fn new(shape: AttributeShape) -> Self {
        Self {
            shape,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            write_only: false,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(AttributeShape::String)
    }

    pub fn int64() -> Self {
        Self::new(AttributeShape::Int64)
    }

    pub fn float64() -> Self {
        Self::new(AttributeShape::Float64)
    }

    pub fn bool() -> Self {
        Self::new(AttributeShape::Bool)
    }

    pub fn list(element: AttrType) -> Self {
        Self::new(AttributeShape::List { element })
    }

    pub fn set(element: AttrType) -> Self {
        Self::new(AttributeShape::Set { element })
    }

    pub fn map(element: AttrType) -> Self {
        Self::new(AttributeShape::Map { element })
    }

    pub fn single_nested<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeSchema)>,
        K: Into<String>,
    {
        Self::new(AttributeShape::SingleNested {
            attributes: collect(attributes),
        })
    }

    pub fn list_nested<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeSchema)>,
        K: Into<String>,
    {
        Self::new(AttributeShape::ListNested {
            attributes: collect(attributes),
        })
    }

    pub fn set_nested<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeSchema)>,
        K: Into<String>,
    {
        Self::new(AttributeShape::SetNested {
            attributes: collect(attributes),
        })
    }

    pub fn map_nested<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeSchema)>,
        K: Into<String>,
    {
        Self::new(AttributeShape::MapNested {
            attributes: collect(attributes),
        })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn collect<I, K>(attributes: I) -> BTreeMap<String, AttributeSchema>
where
    I: IntoIterator<Item = (K, AttributeSchema)>,
    K: Into<String>,
{
    attributes.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
