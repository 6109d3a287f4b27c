//! TypeScript rendering of a [`ConversionResult`].

mod doc;

pub use doc::clean_doc;

use dtoshape_core::{EmitOptions, MapStyle, PrimitiveKind, ShapeRef, TypeKey};

use crate::graph::{ConversionResult, EntryKind, FieldEntry, RegistryEntry};

/// Render a conversion result with the given options.
pub fn render(result: &ConversionResult, options: &EmitOptions) -> String {
    TypeScriptEmitter::new(options.clone()).render(result)
}

/// TypeScript declaration generator.
///
/// Output is pure text: the root declaration first, then every dependency
/// in discovery order, separated by blank lines.
pub struct TypeScriptEmitter {
    options: EmitOptions,
}

impl TypeScriptEmitter {
    /// Create a new emitter.
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Render every entry of the result.
    pub fn render(&self, result: &ConversionResult) -> String {
        let declarations: Vec<String> = result
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| self.render_entry(result, entry, i == 0))
            .collect();

        let mut out = declarations.join("\n");
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    /// Render a single declaration, doc comment included, ending in a newline.
    pub fn render_entry(&self, result: &ConversionResult, entry: &RegistryEntry, is_root: bool) -> String {
        let mut out = String::new();
        if self.options.include_doc_comments {
            doc::render_doc(entry.doc.as_deref(), "", &mut out);
        }

        let default_export = is_root && self.options.default_export_root;
        match &entry.kind {
            EntryKind::Interface { fields } => {
                out.push_str(self.prefix(default_export));
                out.push_str("interface ");
                out.push_str(&entry.name);
                if !entry.type_params.is_empty() {
                    out.push('<');
                    out.push_str(&entry.type_params.join(", "));
                    out.push('>');
                }

                if fields.is_empty() {
                    out.push_str(" {}\n");
                } else {
                    out.push_str(" {\n");
                    for field in fields {
                        self.render_field(result, field, &mut out);
                    }
                    out.push_str("}\n");
                }
            }
            EntryKind::Enum { constants } => {
                let union = if constants.is_empty() {
                    "never".to_string()
                } else {
                    constants
                        .iter()
                        .map(|c| string_literal(c))
                        .collect::<Vec<_>>()
                        .join(" | ")
                };

                // A type alias cannot be declared `export default` directly.
                if default_export {
                    out.push_str(&format!("type {} = {}{}\n", entry.name, union, self.semi()));
                    out.push_str(&format!("export default {}{}\n", entry.name, self.semi()));
                } else {
                    out.push_str(self.prefix(false));
                    out.push_str(&format!("type {} = {}{}\n", entry.name, union, self.semi()));
                }
            }
        }
        out
    }

    fn render_field(&self, result: &ConversionResult, field: &FieldEntry, out: &mut String) {
        let indent = &self.options.indent;
        if self.options.include_doc_comments {
            doc::render_doc(field.doc.as_deref(), indent, out);
        }

        let name = match &field.json_name {
            Some(json_name) if self.options.use_json_property => json_name,
            _ => &field.name,
        };
        let optional = (field.nullable && self.options.use_optional_for_nullable)
            || (self.options.all_fields_optional && !field.required);

        out.push_str(indent);
        out.push_str(&property_name(name));
        if optional {
            out.push('?');
        }
        out.push_str(": ");
        out.push_str(&self.render_shape(result, &field.shape));
        if field.nullable && !self.options.use_optional_for_nullable {
            out.push_str(" | null");
        }
        out.push_str(self.semi());
        out.push('\n');
    }

    /// Render a shape as a TypeScript type expression.
    pub fn render_shape(&self, result: &ConversionResult, shape: &ShapeRef) -> String {
        match shape {
            ShapeRef::Primitive(PrimitiveKind::Number) => "number".to_string(),
            ShapeRef::Primitive(PrimitiveKind::Boolean) => "boolean".to_string(),
            ShapeRef::Primitive(PrimitiveKind::Date) => "Date".to_string(),
            ShapeRef::StringLike => "string".to_string(),
            ShapeRef::Array(element) => format!("{}[]", self.render_shape(result, element)),
            ShapeRef::MapOf(key, value) => self.render_map(result, key, value),
            ShapeRef::Reference(key) => self.render_reference(result, key),
            ShapeRef::EnumRef(key) => match result.name_of(key) {
                Some(name) => name.to_string(),
                None => "unknown".to_string(),
            },
            ShapeRef::GenericParam(name) => name.clone(),
            ShapeRef::Unknown => "unknown".to_string(),
        }
    }

    fn render_reference(&self, result: &ConversionResult, key: &TypeKey) -> String {
        let Some(entry) = result.entry(key) else {
            return "unknown".to_string();
        };

        let args: Vec<String> = if entry.key == *key {
            entry.type_params.clone()
        } else {
            key.args.iter().map(|a| self.render_shape(result, a)).collect()
        };

        if args.is_empty() {
            entry.name.clone()
        } else {
            format!("{}<{}>", entry.name, args.join(", "))
        }
    }

    fn render_map(&self, result: &ConversionResult, key: &ShapeRef, value: &ShapeRef) -> String {
        let value = self.render_shape(result, value);
        let enum_name = match key {
            ShapeRef::EnumRef(k) => result.name_of(k),
            _ => None,
        };
        let key_type = match key {
            ShapeRef::Primitive(PrimitiveKind::Number) => "number",
            _ => "string",
        };

        match (self.options.map_style, enum_name) {
            (MapStyle::IndexSignature, Some(name)) => format!("{{ [key in {}]?: {} }}", name, value),
            (MapStyle::IndexSignature, None) => format!("{{ [key: {}]: {} }}", key_type, value),
            (MapStyle::Record, Some(name)) => format!("Partial<Record<{}, {}>>", name, value),
            (MapStyle::Record, None) => format!("Record<{}, {}>", key_type, value),
        }
    }

    fn prefix(&self, default_export: bool) -> &'static str {
        if default_export {
            "export default "
        } else if self.options.export {
            "export "
        } else {
            ""
        }
    }

    fn semi(&self) -> &'static str {
        if self.options.semicolons {
            ";"
        } else {
            ""
        }
    }
}

/// Property name as written in an interface body, quoted when it is not a
/// valid identifier.
fn property_name(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::test_support::*;
    use dtoshape_core::{BuilderConfig, GenericPolicy, TypeCatalog, TypeDescriptor};

    fn convert(catalog: &TypeCatalog, root: &str, options: EmitOptions) -> String {
        let result = GraphBuilder::new(catalog).build_named(root).unwrap();
        render(&result, &options)
    }

    fn bare() -> EmitOptions {
        EmitOptions {
            export: false,
            include_doc_comments: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_order_graph() {
        let out = convert(&order_catalog(), "com.acme.Order", EmitOptions::default());
        let expected = "\
/**
 * A placed order.
 */
export interface Order {
  id: number;
  items: Item[];
  customer: Customer;
}

export interface Item {
  sku: string;
  qty: number;
}

export interface Customer {
  name: string;
  orders: Order[];
}
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_enum_union() {
        let out = convert(&status_catalog(), "com.acme.Ticket", EmitOptions::default());
        let expected = "\
export interface Ticket {
  status: Status;
  history: Status[];
}

export type Status = 'ACTIVE' | 'CLOSED';
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_specialized_generics() {
        let out = convert(&box_catalog(), "com.acme.Holder", bare());
        let expected = "\
interface Holder {
  text: BoxString;
  count: BoxNumber;
  again: BoxString;
}

interface BoxString {
  value: string;
  values: string[];
}

interface BoxNumber {
  value: number;
  values: number[];
}
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_generic_interface_policy() {
        let catalog = box_catalog();
        let result = GraphBuilder::new(&catalog)
            .with_builder_config(BuilderConfig {
                generic_policy: GenericPolicy::GenericInterface,
                ..Default::default()
            })
            .build_named("com.acme.Holder")
            .unwrap();

        let expected = "\
interface Holder {
  text: Box<string>;
  count: Box<number>;
  again: Box<string>;
}

interface Box<T> {
  value: T;
  values: T[];
}
";
        assert_eq!(render(&result, &bare()), expected);
    }

    #[test]
    fn test_generic_root() {
        let out = convert(&box_catalog(), "com.acme.Box", bare());
        assert_eq!(out, "interface Box<T> {\n  value: T;\n  values: T[];\n}\n");
    }

    #[test]
    fn test_nullable_conventions() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("com.acme.Profile")
                .with_field(field("nickname", "String").nullable())
                .with_field(field("age", "int")),
        );

        let optional = convert(&catalog, "com.acme.Profile", bare());
        assert_eq!(
            optional,
            "interface Profile {\n  nickname?: string;\n  age: number;\n}\n"
        );

        let union = convert(
            &catalog,
            "com.acme.Profile",
            EmitOptions {
                use_optional_for_nullable: false,
                ..bare()
            },
        );
        assert_eq!(
            union,
            "interface Profile {\n  nickname: string | null;\n  age: number;\n}\n"
        );
    }

    #[test]
    fn test_all_fields_optional_respects_required() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("com.acme.Form")
                .with_field(field("email", "String").required())
                .with_field(field("phone", "String")),
        );
        let out = convert(
            &catalog,
            "com.acme.Form",
            EmitOptions {
                all_fields_optional: true,
                ..bare()
            },
        );
        assert_eq!(out, "interface Form {\n  email: string;\n  phone?: string;\n}\n");
    }

    #[test]
    fn test_json_property_names() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("com.acme.Person")
                .with_field(field("firstName", "String").with_json_name("first-name"))
                .with_field(field("id", "long").with_json_name("person_id")),
        );

        let renamed = convert(&catalog, "com.acme.Person", bare());
        assert_eq!(
            renamed,
            "interface Person {\n  'first-name': string;\n  person_id: number;\n}\n"
        );

        let declared = convert(
            &catalog,
            "com.acme.Person",
            EmitOptions {
                use_json_property: false,
                ..bare()
            },
        );
        assert!(declared.contains("  firstName: string;\n"));
    }

    #[test]
    fn test_map_styles() {
        let catalog = status_catalog().with(
            TypeDescriptor::new("com.acme.Stats")
                .with_field(field("byName", "java.util.Map<String, Integer>"))
                .with_field(field("byId", "java.util.HashMap<Long, String>"))
                .with_field(field("byStatus", "java.util.EnumMap<com.acme.Status, Long>"))
                .with_field(field("byTicket", "java.util.Map<com.acme.Ticket, String>")),
        );

        let index = convert(&catalog, "com.acme.Stats", bare());
        assert!(index.contains("  byName: { [key: string]: number };\n"));
        assert!(index.contains("  byId: { [key: number]: string };\n"));
        assert!(index.contains("  byStatus: { [key in Status]?: number };\n"));
        assert!(index.contains("  byTicket: { [key: string]: string };\n"));

        let record = convert(
            &catalog,
            "com.acme.Stats",
            EmitOptions {
                map_style: MapStyle::Record,
                ..bare()
            },
        );
        assert!(record.contains("  byName: Record<string, number>;\n"));
        assert!(record.contains("  byStatus: Partial<Record<Status, number>>;\n"));
    }

    #[test]
    fn test_default_export_root() {
        let options = EmitOptions {
            default_export_root: true,
            ..EmitOptions::default()
        };

        let out = convert(&status_catalog(), "com.acme.Ticket", options.clone());
        assert!(out.starts_with("export default interface Ticket {\n"));
        assert!(out.contains("\nexport type Status = 'ACTIVE' | 'CLOSED';\n"));

        let enum_root = convert(&status_catalog(), "com.acme.Status", options);
        assert_eq!(
            enum_root,
            "type Status = 'ACTIVE' | 'CLOSED';\nexport default Status;\n"
        );
    }

    #[test]
    fn test_unknown_fallback() {
        let out = convert(&broken_catalog(), "com.acme.Broken", bare());
        assert_eq!(
            out,
            "interface Broken {\n  ok: string;\n  gone: unknown;\n  lost: unknown;\n}\n"
        );
    }

    #[test]
    fn test_without_semicolons() {
        let out = convert(
            &status_catalog(),
            "com.acme.Status",
            EmitOptions {
                semicolons: false,
                ..bare()
            },
        );
        assert_eq!(out, "type Status = 'ACTIVE' | 'CLOSED'\n");
    }

    #[test]
    fn test_field_docs_and_indent() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("com.acme.Note")
                .with_field(field("body", "String").with_doc("/** Markdown body. */")),
        );
        let out = convert(
            &catalog,
            "com.acme.Note",
            EmitOptions {
                indent: "    ".to_string(),
                export: false,
                ..Default::default()
            },
        );
        assert_eq!(
            out,
            "interface Note {\n    /**\n     * Markdown body.\n     */\n    body: string;\n}\n"
        );
    }

    #[test]
    fn test_empty_interface_and_enum() {
        let catalog = TypeCatalog::new()
            .with(TypeDescriptor::new("com.acme.Marker").with_field(field("kind", "com.acme.Kind")))
            .with(TypeDescriptor::enumeration("com.acme.Kind", Vec::<String>::new()))
            .with(TypeDescriptor::new("com.acme.Empty"));

        assert_eq!(convert(&catalog, "com.acme.Empty", bare()), "interface Empty {}\n");
        assert!(convert(&catalog, "com.acme.Marker", bare()).ends_with("type Kind = never;\n"));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(property_name("name"), "name");
        assert_eq!(property_name("$ref"), "$ref");
        assert_eq!(property_name("first-name"), "'first-name'");
        assert_eq!(property_name("1st"), "'1st'");
        assert_eq!(string_literal("it's"), "'it\\'s'");
    }

    #[test]
    fn test_render_is_deterministic() {
        let catalog = order_catalog();
        let a = convert(&catalog, "com.acme.Order", EmitOptions::default());
        let b = convert(&catalog, "com.acme.Order", EmitOptions::default());
        assert_eq!(a, b);
    }
}
