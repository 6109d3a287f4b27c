//! Emission names for registry entries.

use std::collections::{HashMap, HashSet};

use dtoshape_core::schema::simple_name_of;
use dtoshape_core::{PrimitiveKind, ShapeRef, TypeKey};
use indexmap::IndexMap;

/// TypeScript globals the emitter itself may reference.
const RESERVED: &[&str] = &[
    "Array", "Boolean", "Date", "Map", "Number", "Object", "Partial", "Promise", "Readonly",
    "Record", "Set", "String", "unknown",
];

/// Input to name allocation: an entry's key and its declared simple name.
#[derive(Debug, Clone, Copy)]
pub struct NameRequest<'a> {
    pub key: &'a TypeKey,
    pub simple_name: &'a str,
}

/// Assigns unique, deterministic emission names in registry order.
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a name to every request. Instantiations of the same qualified
    /// name are labelled with their arguments; any remaining clash gets a
    /// numeric suffix. The first request claims a name first.
    pub fn assign(mut self, requests: &[NameRequest<'_>]) -> IndexMap<TypeKey, String> {
        let mut instantiations: HashMap<&str, usize> = HashMap::new();
        for req in requests {
            *instantiations.entry(req.key.name.as_str()).or_default() += 1;
        }

        let mut names = IndexMap::with_capacity(requests.len());
        for req in requests {
            let mut base = sanitize_type_name(req.simple_name);
            if instantiations[req.key.name.as_str()] > 1 {
                for arg in &req.key.args {
                    base.push_str(&label(arg));
                }
            }
            let name = self.claim(base);
            names.insert(req.key.clone(), name);
        }
        names
    }

    fn claim(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&candidate) || RESERVED.contains(&candidate.as_str()) {
            candidate = format!("{}{}", base, suffix);
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// Identifier fragment describing a generic argument.
fn label(shape: &ShapeRef) -> String {
    match shape {
        ShapeRef::Primitive(PrimitiveKind::Number) => "Number".to_string(),
        ShapeRef::Primitive(PrimitiveKind::Boolean) => "Boolean".to_string(),
        ShapeRef::Primitive(PrimitiveKind::Date) => "Date".to_string(),
        ShapeRef::StringLike => "String".to_string(),
        ShapeRef::Array(element) => format!("{}List", label(element)),
        ShapeRef::MapOf(key, value) => format!("{}{}Map", label(key), label(value)),
        ShapeRef::Reference(key) => {
            let mut out = sanitize_type_name(simple_name_of(&key.name));
            for arg in &key.args {
                out.push_str(&label(arg));
            }
            out
        }
        ShapeRef::EnumRef(key) => sanitize_type_name(simple_name_of(&key.name)),
        ShapeRef::GenericParam(name) => sanitize_type_name(name),
        ShapeRef::Unknown => "Unknown".to_string(),
    }
}

/// Turn a declared simple name into a TypeScript identifier.
///
/// Nested and local class separators become `_` (`Outer$Inner` -> `Outer_Inner`).
pub fn sanitize_type_name(simple_name: &str) -> String {
    let mut out: String = simple_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if out.is_empty() || out.chars().all(|c| c == '_') {
        return "Anonymous".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(keys: &[(TypeKey, &str)]) -> Vec<String> {
        let requests: Vec<NameRequest<'_>> = keys
            .iter()
            .map(|(key, name)| NameRequest {
                key,
                simple_name: *name,
            })
            .collect();
        NameAllocator::new().assign(&requests).into_values().collect()
    }

    #[test]
    fn test_plain_names() {
        let names = assign(&[
            (TypeKey::plain("com.acme.Order"), "Order"),
            (TypeKey::plain("com.acme.Item"), "Item"),
        ]);
        assert_eq!(names, vec!["Order", "Item"]);
    }

    #[test]
    fn test_instantiations_are_labelled() {
        let names = assign(&[
            (TypeKey::plain("com.acme.Holder"), "Holder"),
            (
                TypeKey::with_args("com.acme.Box", vec![ShapeRef::StringLike]),
                "Box",
            ),
            (
                TypeKey::with_args(
                    "com.acme.Box",
                    vec![ShapeRef::Primitive(PrimitiveKind::Number)],
                ),
                "Box",
            ),
            (
                TypeKey::with_args("com.acme.Box", vec![ShapeRef::Unknown]),
                "Box",
            ),
        ]);
        assert_eq!(names, vec!["Holder", "BoxString", "BoxNumber", "BoxUnknown"]);
    }

    #[test]
    fn test_single_instantiation_keeps_base_name() {
        let names = assign(&[(
            TypeKey::with_args(
                "com.acme.Page",
                vec![ShapeRef::array(ShapeRef::Reference(TypeKey::plain("com.acme.Item")))],
            ),
            "Page",
        )]);
        assert_eq!(names, vec!["Page"]);
    }

    #[test]
    fn test_same_simple_name_gets_suffix() {
        let names = assign(&[
            (TypeKey::plain("com.acme.a.Item"), "Item"),
            (TypeKey::plain("com.acme.b.Item"), "Item"),
            (TypeKey::plain("com.acme.c.Item"), "Item"),
        ]);
        assert_eq!(names, vec!["Item", "Item2", "Item3"]);
    }

    #[test]
    fn test_reserved_names_avoided() {
        let names = assign(&[(TypeKey::plain("com.acme.Record"), "Record")]);
        assert_eq!(names, vec!["Record2"]);
    }

    #[test]
    fn test_labels_for_nested_args() {
        let names = assign(&[
            (
                TypeKey::with_args(
                    "com.acme.Box",
                    vec![ShapeRef::array(ShapeRef::Reference(TypeKey::plain("com.acme.Item")))],
                ),
                "Box",
            ),
            (
                TypeKey::with_args(
                    "com.acme.Box",
                    vec![ShapeRef::map(ShapeRef::StringLike, ShapeRef::GenericParam("T".into()))],
                ),
                "Box",
            ),
        ]);
        assert_eq!(names, vec!["BoxItemList", "BoxStringTMap"]);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_type_name("Order"), "Order");
        assert_eq!(sanitize_type_name("Outer$Inner"), "Outer_Inner");
        assert_eq!(sanitize_type_name("Outer$1"), "Outer_1");
        assert_eq!(sanitize_type_name("1"), "_1");
        assert_eq!(sanitize_type_name(""), "Anonymous");
        assert_eq!(sanitize_type_name("$"), "Anonymous");
    }

    #[test]
    fn test_deterministic() {
        let keys = [
            (TypeKey::plain("a.X"), "X"),
            (TypeKey::plain("b.X"), "X"),
            (TypeKey::with_args("c.Y", vec![ShapeRef::StringLike]), "Y"),
            (TypeKey::with_args("c.Y", vec![ShapeRef::Unknown]), "Y"),
        ];
        assert_eq!(assign(&keys), assign(&keys));
    }
}
