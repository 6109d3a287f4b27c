//! Core data model for converting DTO type graphs into TypeScript declarations.
//!
//! The engine in `dtoshape-codegen` never parses source code. It reads
//! [`TypeDescriptor`] snapshots from a [`TypeProvider`] and produces
//! [`ShapeRef`] values keyed by [`TypeKey`].

pub mod cancel;
pub mod config;
pub mod error;
pub mod schema;

pub use cancel::CancelFlag;
pub use config::{BuilderConfig, ConvertConfig, EmitOptions, GenericPolicy, MapStyle, ResolverConfig};
pub use error::{ConvertError, Result};
pub use schema::{
    FieldDescriptor, PrimitiveKind, ShapeRef, TypeCatalog, TypeDescriptor, TypeExpr, TypeKey,
    TypeKind, TypeProvider, WildcardKind,
};
