mod emit;

pub use emit::{EmitOptions, MapStyle};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// Root configuration for a conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Type resolution policy.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Graph traversal policy.
    #[serde(default)]
    pub builder: BuilderConfig,

    /// Output formatting.
    #[serde(default)]
    pub emit: EmitOptions,
}

impl ConvertConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConvertError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);

        toml::from_str(&content)
            .map_err(|e| ConvertError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// How field types are mapped onto shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Map date and time types to strings (their JSON wire form).
    #[serde(default = "default_true")]
    pub dates_as_strings: bool,

    /// Map `java.util.UUID` to a string.
    #[serde(default = "default_true")]
    pub uuid_as_string: bool,

    /// Maximum nesting of a single type expression.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum nesting of a generic argument inside a type key. Deeper
    /// arguments become `Unknown` (`class Nest<T> { Nest<List<T>> deeper; }`).
    #[serde(default = "default_max_arg_depth")]
    pub max_arg_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            dates_as_strings: true,
            uuid_as_string: true,
            max_depth: default_max_depth(),
            max_arg_depth: default_max_arg_depth(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> usize {
    64
}

fn default_max_arg_depth() -> usize {
    6
}

/// How generic instantiations become registry entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericPolicy {
    /// One entry per distinct instantiation (`Box<String>`, `Box<Integer>`).
    #[default]
    Specialize,
    /// One generic entry per type (`interface Box<T>`).
    GenericInterface,
}

impl GenericPolicy {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenericPolicy::Specialize => "specialize",
            GenericPolicy::GenericInterface => "generic_interface",
        }
    }
}

impl std::fmt::Display for GenericPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GenericPolicy {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "specialize" => Ok(GenericPolicy::Specialize),
            "generic_interface" | "generic-interface" | "generic" => {
                Ok(GenericPolicy::GenericInterface)
            }
            other => Err(ConvertError::Config(format!(
                "Unknown generic policy: {}",
                other
            ))),
        }
    }
}

/// Graph traversal policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub generic_policy: GenericPolicy,

    /// Collect only a type's own fields, not inherited ones.
    #[serde(default)]
    pub ignore_parent_fields: bool,

    /// Leave out transient fields.
    #[serde(default = "default_true")]
    pub skip_transient: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            generic_policy: GenericPolicy::default(),
            ignore_parent_fields: false,
            skip_transient: true,
        }
    }
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
        Ok(re) => re,
        Err(_) => return result,
    };

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
