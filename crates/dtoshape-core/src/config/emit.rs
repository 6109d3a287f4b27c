use serde::{Deserialize, Serialize};

/// Rendering of map-typed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    /// `{ [key: string]: V }`
    #[default]
    IndexSignature,
    /// `Record<K, V>`
    Record,
}

/// TypeScript output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitOptions {
    /// Render nullable fields as `name?: T` instead of `name: T | null`.
    #[serde(default = "default_true")]
    pub use_optional_for_nullable: bool,

    /// Indentation for field lines.
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Carry type and field documentation into `/** */` blocks.
    #[serde(default = "default_true")]
    pub include_doc_comments: bool,

    /// Terminate field lines and type aliases with `;`.
    #[serde(default = "default_true")]
    pub semicolons: bool,

    /// Prefix declarations with `export`.
    #[serde(default = "default_true")]
    pub export: bool,

    /// Declare the root as `export default`.
    #[serde(default)]
    pub default_export_root: bool,

    #[serde(default)]
    pub map_style: MapStyle,

    /// Mark every field optional unless it carries a required marker.
    #[serde(default)]
    pub all_fields_optional: bool,

    /// Use a field's serialized name when it has one.
    #[serde(default = "default_true")]
    pub use_json_property: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            use_optional_for_nullable: true,
            indent: default_indent(),
            include_doc_comments: true,
            semicolons: true,
            export: true,
            default_export_root: false,
            map_style: MapStyle::default(),
            all_fields_optional: false,
            use_json_property: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_indent() -> String {
    "  ".to_string()
}
