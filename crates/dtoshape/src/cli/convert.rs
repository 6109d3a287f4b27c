use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dtoshape_codegen::{Conversion, Converter};
use dtoshape_core::{ConvertConfig, GenericPolicy};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::fixtures::load_catalog;
use super::CONFIG_FILE;

/// Convert a root type and everything it references.
#[derive(Parser)]
pub struct ConvertCommand {
    /// Descriptor fixture file, or a directory scanned for .json/.toml fixtures.
    #[arg(short, long)]
    pub types: PathBuf,

    /// Root type (qualified name, or simple name when unambiguous).
    #[arg(short, long)]
    pub root: String,

    /// Configuration file path (defaults to dtoshape.toml when it exists).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write declarations to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generic instantiation policy: specialize or generic-interface (overrides config).
    #[arg(long)]
    pub policy: Option<GenericPolicy>,

    /// Render nullable fields as `name?: T` (true) or `name: T | null` (false).
    #[arg(long)]
    pub optional_nullable: Option<bool>,

    /// Declare the root as the module's default export.
    #[arg(long)]
    pub default_export: bool,

    /// Fail when the conversion reports any diagnostic.
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertCommand {
    /// Execute the convert command.
    pub fn execute(self) -> Result<()> {
        super::init_tracing(self.verbose);

        let conversion = self.convert()?;

        match &self.output {
            Some(path) => {
                write_output(path, &conversion.text)?;
                eprintln!(
                    "{} Wrote {} declaration(s) to {}",
                    style("✓").green(),
                    conversion.result.len(),
                    style(path.display()).cyan()
                );
            }
            None => print!("{}", conversion.text),
        }

        report_diagnostics(&conversion);

        if self.strict && conversion.result.has_diagnostics() {
            anyhow::bail!(
                "{} diagnostic(s) reported in strict mode",
                conversion.result.diagnostics().len()
            );
        }
        Ok(())
    }

    /// Load descriptors and configuration, then run the conversion.
    pub fn convert(&self) -> Result<Conversion> {
        let catalog = load_catalog(&self.types)?;
        let root = catalog.find_root(&self.root)?;
        let config = self.load_config()?;

        info!(
            root = %root.qualified_name,
            types = catalog.len(),
            policy = %config.builder.generic_policy,
            "Converting"
        );

        let conversion = Converter::new(&catalog).with_config(config).convert(&root)?;
        Ok(conversion)
    }

    /// Resolve the effective configuration: file, then command-line overrides.
    pub fn load_config(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None if Path::new(CONFIG_FILE).exists() => ConvertConfig::from_file(CONFIG_FILE)?,
            None => ConvertConfig::default(),
        };

        if let Some(policy) = self.policy {
            config.builder.generic_policy = policy;
        }
        if let Some(optional) = self.optional_nullable {
            config.emit.use_optional_for_nullable = optional;
        }
        if self.default_export {
            config.emit.default_export_root = true;
        }
        Ok(config)
    }
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn report_diagnostics(conversion: &Conversion) {
    let diagnostics = conversion.result.diagnostics();
    if diagnostics.is_empty() {
        return;
    }

    eprintln!();
    eprintln!(
        "{} {} diagnostic(s):",
        style("⚠").yellow(),
        diagnostics.len()
    );
    for diagnostic in diagnostics {
        eprintln!("  {} {}", style("-").dim(), diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FIXTURE: &str = r#"{
  "types": [
    {
      "qualified_name": "com.acme.Order",
      "doc": "/** A placed order. */",
      "fields": [
        { "name": "id", "type": "java.lang.Long" },
        { "name": "note", "type": "String", "nullable": true },
        { "name": "items", "type": "java.util.List<com.acme.Item>" },
        { "name": "customer", "type": "com.acme.Customer" }
      ]
    },
    {
      "qualified_name": "com.acme.Item",
      "fields": [
        { "name": "sku", "type": "java.lang.String" },
        { "name": "qty", "type": "java.lang.Integer" }
      ]
    },
    {
      "qualified_name": "com.acme.Customer",
      "fields": [
        { "name": "name", "type": "java.lang.String" },
        { "name": "orders", "type": "java.util.List<com.acme.Order>" },
        { "name": "region", "type": "!com.acme.Region" }
      ]
    }
  ]
}"#;

    fn command(types: PathBuf) -> ConvertCommand {
        ConvertCommand {
            types,
            root: "Order".to_string(),
            config: None,
            output: None,
            policy: None,
            optional_nullable: None,
            default_export: false,
            strict: false,
            verbose: false,
        }
    }

    fn fixture(dir: &Path) -> PathBuf {
        let path = dir.join("types.json");
        fs::write(&path, FIXTURE).unwrap();
        path
    }

    #[test]
    fn test_convert_fixture() {
        let dir = tempdir().unwrap();
        let cmd = command(fixture(dir.path()));

        let conversion = cmd.convert().unwrap();
        assert_eq!(conversion.result.len(), 3);
        assert!(conversion.text.starts_with("/**\n * A placed order.\n */\nexport interface Order {"));
        assert!(conversion.text.contains("  note?: string;\n"));
        assert!(conversion.text.contains("  orders: Order[];\n"));
        assert!(conversion.text.contains("  region: unknown;\n"));
        assert_eq!(conversion.result.diagnostics().len(), 1);
    }

    #[test]
    fn test_writes_output_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("generated/order.ts");
        let cmd = ConvertCommand {
            output: Some(output.clone()),
            ..command(fixture(dir.path()))
        };

        cmd.execute().unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("export interface Customer {"));
        assert!(written.ends_with("}\n"));
    }

    #[test]
    fn test_strict_fails_on_diagnostics() {
        let dir = tempdir().unwrap();
        let cmd = ConvertCommand {
            strict: true,
            output: Some(dir.path().join("order.ts")),
            ..command(fixture(dir.path()))
        };
        assert!(cmd.execute().is_err());
    }

    #[test]
    fn test_flag_overrides() {
        let dir = tempdir().unwrap();
        let cmd = ConvertCommand {
            optional_nullable: Some(false),
            default_export: true,
            ..command(fixture(dir.path()))
        };

        let conversion = cmd.convert().unwrap();
        assert!(conversion.text.contains("export default interface Order {"));
        assert!(conversion.text.contains("  note: string | null;\n"));
    }

    #[test]
    fn test_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("dtoshape.toml");
        fs::write(
            &config,
            r#"
[emit]
export = false
include_doc_comments = false
indent = "    "
"#,
        )
        .unwrap();

        let cmd = ConvertCommand {
            config: Some(config),
            ..command(fixture(dir.path()))
        };
        let conversion = cmd.convert().unwrap();
        assert!(conversion.text.starts_with("interface Order {\n    id: number;\n"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        let cmd = ConvertCommand {
            config: Some(dir.path().join("missing.toml")),
            ..command(fixture(dir.path()))
        };
        assert!(cmd.convert().is_err());
    }

    #[test]
    fn test_unknown_root() {
        let dir = tempdir().unwrap();
        let cmd = ConvertCommand {
            root: "Invoice".to_string(),
            ..command(fixture(dir.path()))
        };
        let err = cmd.convert().unwrap_err();
        assert!(err.to_string().contains("Invoice"));
    }
}
