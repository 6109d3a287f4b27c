use anyhow::Result;
use clap::Parser;
use console::style;
use dtoshape_core::{TypeCatalog, TypeDescriptor};
use std::path::PathBuf;

use super::fixtures::load_catalog;

/// List the types available in descriptor fixtures.
#[derive(Parser)]
pub struct ListCommand {
    /// Descriptor fixture file, or a directory scanned for .json/.toml fixtures.
    #[arg(short, long)]
    pub types: PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self) -> Result<()> {
        super::init_tracing(self.verbose);

        let catalog = load_catalog(&self.types)?;
        for line in describe(&catalog) {
            println!("{}", line);
        }
        eprintln!();
        eprintln!(
            "{} {} type(s) in {}",
            style("✓").green(),
            catalog.len(),
            style(self.types.display()).cyan()
        );
        Ok(())
    }
}

/// One line per type: kind, qualified name with generics, and a size hint.
fn describe(catalog: &TypeCatalog) -> Vec<String> {
    catalog.iter().map(|desc| describe_type(desc)).collect()
}

fn describe_type(desc: &TypeDescriptor) -> String {
    let mut name = desc.qualified_name.clone();
    if !desc.type_params.is_empty() {
        name.push('<');
        name.push_str(&desc.type_params.join(", "));
        name.push('>');
    }

    let detail = if desc.is_enum() {
        format!("{} constant(s)", desc.enum_constants.len())
    } else {
        format!("{} field(s)", desc.fields.len())
    };

    match &desc.supertype {
        Some(supertype) => format!("{:<10} {} extends {} ({})", desc.kind.as_str(), name, supertype, detail),
        None => format!("{:<10} {} ({})", desc.kind.as_str(), name, detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtoshape_core::{FieldDescriptor, TypeExpr};

    #[test]
    fn test_describe() {
        let catalog = TypeCatalog::new()
            .with(
                TypeDescriptor::new("com.acme.Page")
                    .with_type_param("T")
                    .with_supertype(TypeExpr::parse("com.acme.Base").unwrap())
                    .with_field(FieldDescriptor::parsed("items", "java.util.List<T>").unwrap()),
            )
            .with(TypeDescriptor::enumeration("com.acme.Status", ["ACTIVE", "CLOSED"]));

        let lines = describe(&catalog);
        assert_eq!(
            lines,
            vec![
                "class      com.acme.Page<T> extends com.acme.Base (1 field(s))",
                "enum       com.acme.Status (2 constant(s))",
            ]
        );
    }
}
