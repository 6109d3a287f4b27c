//! Descriptor catalogs shared by the scenario tests.

use dtoshape_core::{FieldDescriptor, TypeCatalog, TypeDescriptor, TypeExpr};

pub fn field(name: &str, ty: &str) -> FieldDescriptor {
    FieldDescriptor::parsed(name, ty).unwrap()
}

pub fn expr(ty: &str) -> TypeExpr {
    TypeExpr::parse(ty).unwrap()
}

/// Order -> Item, Order -> Customer -> Order (cycle).
pub fn order_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(
            TypeDescriptor::new("com.acme.Order")
                .with_doc("/**\n * A placed order.\n * @author someone\n */")
                .with_field(field("id", "java.lang.Long"))
                .with_field(field("items", "java.util.List<com.acme.Item>"))
                .with_field(field("customer", "com.acme.Customer")),
        )
        .with(
            TypeDescriptor::new("com.acme.Item")
                .with_field(field("sku", "java.lang.String"))
                .with_field(field("qty", "java.lang.Integer")),
        )
        .with(
            TypeDescriptor::new("com.acme.Customer")
                .with_field(field("name", "java.lang.String"))
                .with_field(field("orders", "java.util.List<com.acme.Order>")),
        )
}

/// Ticket with an enum status.
pub fn status_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(
            TypeDescriptor::new("com.acme.Ticket")
                .with_field(field("status", "com.acme.Status"))
                .with_field(field("history", "java.util.List<com.acme.Status>")),
        )
        .with(TypeDescriptor::enumeration(
            "com.acme.Status",
            ["ACTIVE", "CLOSED"],
        ))
}

/// Box<T> used as Box<String>, Box<Integer> and raw Box.
pub fn box_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(
            TypeDescriptor::new("com.acme.Box")
                .with_type_param("T")
                .with_field(field("value", "T"))
                .with_field(field("values", "java.util.List<T>")),
        )
        .with(
            TypeDescriptor::new("com.acme.Holder")
                .with_field(field("text", "com.acme.Box<java.lang.String>"))
                .with_field(field("count", "com.acme.Box<java.lang.Integer>"))
                .with_field(field("again", "com.acme.Box<String>")),
        )
        .with(
            TypeDescriptor::new("com.acme.RawHolder")
                .with_field(field("raw", "com.acme.Box"))
                .with_field(field("typed", "com.acme.Box<java.lang.String>")),
        )
}

/// Derived redeclares `id` from Base.
pub fn shadow_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(
            TypeDescriptor::new("com.acme.Base")
                .with_field(field("id", "java.lang.String"))
                .with_field(field("createdBy", "java.lang.String")),
        )
        .with(
            TypeDescriptor::new("com.acme.Derived")
                .with_supertype(expr("com.acme.Base"))
                .with_field(field("id", "java.lang.Long"))
                .with_field(field("label", "java.lang.String")),
        )
}

/// One field whose type the provider cannot resolve.
pub fn broken_catalog() -> TypeCatalog {
    TypeCatalog::new().with(
        TypeDescriptor::new("com.acme.Broken")
            .with_field(field("ok", "java.lang.String"))
            .with_field(field("gone", "com.acme.Gone"))
            .with_field(field("lost", "!com.acme.Lost")),
    )
}
