use std::fmt;

/// Primitive value categories that survive the structural mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Number,
    Boolean,
    /// Date-like value kept as a date rather than a string.
    Date,
}

impl PrimitiveKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Date => "date",
        }
    }
}

/// Resolved, structural description of a type usage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeRef {
    Primitive(PrimitiveKind),
    StringLike,
    Array(Box<ShapeRef>),
    MapOf(Box<ShapeRef>, Box<ShapeRef>),
    Reference(TypeKey),
    GenericParam(String),
    EnumRef(TypeKey),
    Unknown,
}

impl ShapeRef {
    /// Array of `element`.
    pub fn array(element: ShapeRef) -> Self {
        ShapeRef::Array(Box::new(element))
    }

    /// Map from `key` to `value`.
    pub fn map(key: ShapeRef, value: ShapeRef) -> Self {
        ShapeRef::MapOf(Box::new(key), Box::new(value))
    }

    /// Key of the registry entry this shape points at, if any.
    pub fn type_key(&self) -> Option<&TypeKey> {
        match self {
            ShapeRef::Reference(key) | ShapeRef::EnumRef(key) => Some(key),
            _ => None,
        }
    }

    /// Visit every registry key reachable from this shape, outermost first.
    pub fn for_each_key<F: FnMut(&TypeKey)>(&self, f: &mut F) {
        match self {
            ShapeRef::Array(element) => element.for_each_key(f),
            ShapeRef::MapOf(key, value) => {
                key.for_each_key(f);
                value.for_each_key(f);
            }
            ShapeRef::Reference(key) | ShapeRef::EnumRef(key) => {
                f(key);
                for arg in &key.args {
                    arg.for_each_key(f);
                }
            }
            ShapeRef::Primitive(_)
            | ShapeRef::StringLike
            | ShapeRef::GenericParam(_)
            | ShapeRef::Unknown => {}
        }
    }

    /// Nesting depth; scalars, parameters and plain references are 1.
    pub fn depth(&self) -> usize {
        match self {
            ShapeRef::Array(element) => 1 + element.depth(),
            ShapeRef::MapOf(key, value) => 1 + key.depth().max(value.depth()),
            ShapeRef::Reference(key) | ShapeRef::EnumRef(key) => {
                1 + key.args.iter().map(ShapeRef::depth).max().unwrap_or(0)
            }
            ShapeRef::Primitive(_)
            | ShapeRef::StringLike
            | ShapeRef::GenericParam(_)
            | ShapeRef::Unknown => 1,
        }
    }

    /// Generic parameter names used anywhere in this shape, in first-seen order.
    pub fn collect_params(&self, out: &mut Vec<String>) {
        match self {
            ShapeRef::GenericParam(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            ShapeRef::Array(element) => element.collect_params(out),
            ShapeRef::MapOf(key, value) => {
                key.collect_params(out);
                value.collect_params(out);
            }
            ShapeRef::Reference(key) | ShapeRef::EnumRef(key) => {
                for arg in &key.args {
                    arg.collect_params(out);
                }
            }
            ShapeRef::Primitive(_) | ShapeRef::StringLike | ShapeRef::Unknown => {}
        }
    }
}

impl fmt::Display for ShapeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeRef::Primitive(kind) => write!(f, "{}", kind.as_str()),
            ShapeRef::StringLike => write!(f, "string"),
            ShapeRef::Array(element) => write!(f, "{}[]", element),
            ShapeRef::MapOf(key, value) => write!(f, "map<{}, {}>", key, value),
            ShapeRef::Reference(key) => write!(f, "{}", key),
            ShapeRef::GenericParam(name) => write!(f, "{}", name),
            ShapeRef::EnumRef(key) => write!(f, "enum {}", key),
            ShapeRef::Unknown => write!(f, "unknown"),
        }
    }
}

/// Canonical identity of a registry entry: qualified name plus resolved
/// generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub name: String,
    pub args: Vec<ShapeRef>,
}

impl TypeKey {
    /// Key without generic arguments.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Key with resolved generic arguments.
    pub fn with_args(name: impl Into<String>, args: Vec<ShapeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}
