use dtoshape_core::{CancelFlag, ConvertConfig, ConvertError, Result, TypeDescriptor, TypeProvider};

use crate::graph::{ConversionResult, GraphBuilder};
use crate::typescript::TypeScriptEmitter;

/// A finished conversion: the registry and its rendered text.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub result: ConversionResult,
    pub text: String,
}

/// Runs graph building and emission with one configuration.
pub struct Converter<P> {
    provider: P,
    config: ConvertConfig,
    cancel: Option<CancelFlag>,
}

impl<P: TypeProvider> Converter<P> {
    /// Create a new converter with default configuration.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: ConvertConfig::default(),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: ConvertConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert the graph reachable from `root`.
    pub fn convert(&self, root: &TypeDescriptor) -> Result<Conversion> {
        let mut builder = GraphBuilder::new(&self.provider).with_config(&self.config);
        if let Some(cancel) = &self.cancel {
            builder = builder.with_cancel(cancel.clone());
        }

        let result = builder.build(root)?;
        let text = TypeScriptEmitter::new(self.config.emit.clone()).render(&result);
        Ok(Conversion { result, text })
    }

    /// Convert a root looked up by qualified name.
    pub fn convert_named(&self, qualified_name: &str) -> Result<Conversion> {
        let root = self
            .provider
            .lookup(qualified_name)
            .ok_or_else(|| ConvertError::RootNotFound(qualified_name.to_string()))?;
        self.convert(&root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use dtoshape_core::{EmitOptions, GenericPolicy};

    #[test]
    fn test_convert_order() {
        let catalog = order_catalog();
        let conversion = Converter::new(&catalog).convert_named("com.acme.Order").unwrap();

        assert_eq!(conversion.result.len(), 3);
        assert_eq!(conversion.result.root_name(), "Order");
        assert!(conversion.text.contains("  orders: Order[];\n"));
        assert_eq!(conversion.text.matches("interface Order ").count(), 1);
    }

    #[test]
    fn test_config_flows_through() {
        let mut config = ConvertConfig::default();
        config.builder.generic_policy = GenericPolicy::GenericInterface;
        config.emit = EmitOptions {
            export: false,
            ..Default::default()
        };

        let catalog = box_catalog();
        let conversion = Converter::new(&catalog)
            .with_config(config)
            .convert_named("com.acme.Holder")
            .unwrap();
        assert!(conversion.text.starts_with("interface Holder {\n  text: Box<string>;"));
    }

    #[test]
    fn test_diagnostics_do_not_fail() {
        let catalog = broken_catalog();
        let conversion = Converter::new(&catalog).convert_named("com.acme.Broken").unwrap();
        assert_eq!(conversion.result.diagnostics().len(), 2);
        assert!(conversion.text.contains("gone: unknown;"));
    }

    #[test]
    fn test_cancelled() {
        let catalog = order_catalog();
        let cancel = CancelFlag::new();
        let converter = Converter::new(&catalog).with_cancel(cancel.clone());
        assert!(converter.convert_named("com.acme.Order").is_ok());

        cancel.cancel();
        let err = converter.convert_named("com.acme.Order").unwrap_err();
        assert!(matches!(err, ConvertError::Cancelled { .. }));
    }

    #[test]
    fn test_missing_root() {
        let catalog = order_catalog();
        let err = Converter::new(&catalog).convert_named("Order").unwrap_err();
        assert!(matches!(err, ConvertError::RootNotFound(name) if name == "Order"));
    }

    #[test]
    fn test_byte_identical_output() {
        let catalog = status_catalog();
        let converter = Converter::new(&catalog);
        let first = converter.convert_named("com.acme.Ticket").unwrap().text;
        let second = converter.convert_named("com.acme.Ticket").unwrap().text;
        assert_eq!(first, second);
    }
}
