mod catalog;
mod descriptor;
mod shape;
mod types;

pub use catalog::{TypeCatalog, TypeProvider};
pub use descriptor::{simple_name_of, FieldDescriptor, TypeDescriptor, TypeKind};
pub use shape::{PrimitiveKind, ShapeRef, TypeKey};
pub use types::{TypeExpr, WildcardKind};
