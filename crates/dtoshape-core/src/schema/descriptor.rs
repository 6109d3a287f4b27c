use serde::{Deserialize, Serialize};

use super::types::TypeExpr;
use crate::error::Result;

/// Kind of a nominal type as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    /// A type that behaves as a one-argument collection.
    Collection,
    /// A type that behaves as a two-argument map.
    Map,
    /// A boxed primitive.
    PrimitiveWrapper,
}

impl TypeKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Collection => "collection",
            TypeKind::Map => "map",
            TypeKind::PrimitiveWrapper => "primitive_wrapper",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable snapshot of a nominal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully qualified name, e.g. `com.acme.Order`.
    pub qualified_name: String,

    /// Simple name. Derived from the qualified name when omitted.
    #[serde(default)]
    pub simple_name: String,

    /// Type kind.
    #[serde(default)]
    pub kind: TypeKind,

    /// Declared generic parameter names, in order.
    #[serde(default)]
    pub type_params: Vec<String>,

    /// Own fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Direct supertype with its type arguments.
    #[serde(default)]
    pub supertype: Option<TypeExpr>,

    /// Enum constant names, in declaration order.
    #[serde(default)]
    pub enum_constants: Vec<String>,

    /// Documentation comment.
    #[serde(default)]
    pub doc: Option<String>,
}

impl TypeDescriptor {
    /// Create a class descriptor.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let simple_name = simple_name_of(&qualified_name).to_string();
        Self {
            qualified_name,
            simple_name,
            kind: TypeKind::Class,
            type_params: Vec::new(),
            fields: Vec::new(),
            supertype: None,
            enum_constants: Vec::new(),
            doc: None,
        }
    }

    /// Create an enum descriptor with its constants.
    pub fn enumeration<I, S>(qualified_name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut desc = Self::new(qualified_name);
        desc.kind = TypeKind::Enum;
        desc.enum_constants = constants.into_iter().map(Into::into).collect();
        desc
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add a generic parameter.
    pub fn with_type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the supertype.
    pub fn with_supertype(mut self, supertype: TypeExpr) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Fill in derived values left empty by a fixture document.
    pub fn normalized(mut self) -> Self {
        if self.simple_name.is_empty() {
            self.simple_name = simple_name_of(&self.qualified_name).to_string();
        }
        self
    }

    /// Check if this is an enum.
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}

/// Declared field of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared.
    pub name: String,

    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeExpr,

    /// Whether the field may hold null.
    #[serde(default)]
    pub nullable: bool,

    /// Serialized name override.
    #[serde(default)]
    pub json_name: Option<String>,

    /// Carries a "must be present" marker.
    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub is_static: bool,

    #[serde(default)]
    pub is_transient: bool,

    /// Documentation comment.
    #[serde(default)]
    pub doc: Option<String>,
}

impl FieldDescriptor {
    /// Create a new field.
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            json_name: None,
            required: false,
            is_static: false,
            is_transient: false,
            doc: None,
        }
    }

    /// Create a field from the textual type form.
    pub fn parsed(name: impl Into<String>, ty: &str) -> Result<Self> {
        Ok(Self::new(name, TypeExpr::parse(ty)?))
    }

    /// Mark the field nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the serialized name.
    pub fn with_json_name(mut self, name: impl Into<String>) -> Self {
        self.json_name = Some(name.into());
        self
    }

    /// Set documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Last segment of a qualified name.
pub fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name)
}
