use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use super::descriptor::TypeDescriptor;
use crate::error::{ConvertError, Result};

/// Read-only source of type descriptors.
///
/// Implementations are handed explicitly to the graph builder; the engine
/// performs no ambient lookups.
pub trait TypeProvider {
    /// Look up a type by qualified name. `None` means the symbol is unresolved.
    fn lookup(&self, qualified_name: &str) -> Option<Arc<TypeDescriptor>>;
}

impl<P: TypeProvider + ?Sized> TypeProvider for &P {
    fn lookup(&self, qualified_name: &str) -> Option<Arc<TypeDescriptor>> {
        (**self).lookup(qualified_name)
    }
}

impl<P: TypeProvider + ?Sized> TypeProvider for Arc<P> {
    fn lookup(&self, qualified_name: &str) -> Option<Arc<TypeDescriptor>> {
        (**self).lookup(qualified_name)
    }
}

/// On-disk fixture layout: a list of descriptors under `types`.
#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
}

/// In-memory descriptor catalog, keyed by qualified name in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<String, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one with the same name.
    pub fn register(&mut self, desc: TypeDescriptor) {
        let desc = desc.normalized();
        self.types
            .insert(desc.qualified_name.clone(), Arc::new(desc));
    }

    /// Builder-style registration.
    pub fn with(mut self, desc: TypeDescriptor) -> Self {
        self.register(desc);
        self
    }

    /// Parse a JSON fixture document.
    pub fn from_json_str(source_name: &str, content: &str) -> Result<Self> {
        let doc: FixtureDocument =
            serde_json::from_str(content).map_err(|e| ConvertError::Fixture {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_document(doc))
    }

    /// Parse a TOML fixture document.
    pub fn from_toml_str(source_name: &str, content: &str) -> Result<Self> {
        let doc: FixtureDocument = toml::from_str(content).map_err(|e| ConvertError::Fixture {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_document(doc))
    }

    /// Load a fixture file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let source_name = path.display().to_string();

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&source_name, &content),
            Some("toml") => Self::from_toml_str(&source_name, &content),
            _ => Err(ConvertError::Fixture {
                source_name,
                message: "expected a .json or .toml file".to_string(),
            }),
        }
    }

    fn from_document(doc: FixtureDocument) -> Self {
        let mut catalog = Self::new();
        for desc in doc.types {
            catalog.register(desc);
        }
        catalog
    }

    /// Merge another catalog into this one. Later definitions win.
    pub fn extend(&mut self, other: TypeCatalog) {
        for (name, desc) in other.types {
            if self.types.contains_key(&name) {
                tracing::debug!(type_name = %name, "Replacing duplicate type definition");
            }
            self.types.insert(name, desc);
        }
    }

    /// Find a root type by qualified name, or by simple name when unambiguous.
    pub fn find_root(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        if let Some(desc) = self.types.get(name) {
            return Ok(desc.clone());
        }

        let mut matches = self.types.values().filter(|d| d.simple_name == name);
        match (matches.next(), matches.next()) {
            (Some(desc), None) => Ok(desc.clone()),
            (Some(_), Some(_)) => Err(ConvertError::RootNotFound(format!(
                "{} is ambiguous; use a qualified name",
                name
            ))),
            _ => Err(ConvertError::RootNotFound(name.to_string())),
        }
    }

    /// All registered descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeProvider for TypeCatalog {
    fn lookup(&self, qualified_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(qualified_name).cloned()
    }
}
