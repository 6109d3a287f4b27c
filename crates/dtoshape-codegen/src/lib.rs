//! Conversion engine: type resolution, graph building, naming and
//! TypeScript emission over descriptors supplied by a
//! [`TypeProvider`](dtoshape_core::TypeProvider).

mod builtins;
pub mod converter;
pub mod diagnostics;
pub mod graph;
pub mod naming;
pub mod resolver;
pub mod typescript;

#[cfg(test)]
mod test_support;

pub use converter::{Conversion, Converter};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use graph::{ConversionResult, EntryKind, FieldEntry, GraphBuilder, RegistryEntry};
pub use naming::{sanitize_type_name, NameAllocator, NameRequest};
pub use resolver::{Resolved, TypeResolver};
pub use typescript::{render, TypeScriptEmitter};
