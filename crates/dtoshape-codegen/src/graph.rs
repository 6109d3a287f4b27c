//! Closed, de-duplicated graph of every type reachable from a root.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use dtoshape_core::{
    BuilderConfig, CancelFlag, ConvertConfig, ConvertError, FieldDescriptor, GenericPolicy,
    ResolverConfig, Result, ShapeRef, TypeDescriptor, TypeExpr, TypeKey, TypeProvider,
};
use indexmap::IndexMap;
use tracing::{debug, info, trace, warn};

use crate::builtins;
use crate::diagnostics::{Diagnostic, Issue};
use crate::naming::{NameAllocator, NameRequest};
use crate::resolver::{bind, Bindings, TypeResolver};

/// Resolved field of a registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Declared name.
    pub name: String,
    /// Serialized name override.
    pub json_name: Option<String>,
    pub shape: ShapeRef,
    /// Declared nullable, or typed as `Optional`.
    pub nullable: bool,
    /// Carries a "must be present" marker.
    pub required: bool,
    pub doc: Option<String>,
}

/// What a registry entry emits as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Class-like type with flattened fields.
    Interface { fields: Vec<FieldEntry> },
    /// Enum with its constants in declared order.
    Enum { constants: Vec<String> },
}

/// One emitted type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub key: TypeKey,
    /// Unique emission name.
    pub name: String,
    /// Declared simple name.
    pub simple_name: String,
    pub kind: EntryKind,
    /// Generic parameters the emitted declaration is parameterized over.
    pub type_params: Vec<String>,
    pub doc: Option<String>,
}

impl RegistryEntry {
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, EntryKind::Enum { .. })
    }

    /// Fields of a class-like entry; empty for enums.
    pub fn fields(&self) -> &[FieldEntry] {
        match &self.kind {
            EntryKind::Interface { fields } => fields,
            EntryKind::Enum { .. } => &[],
        }
    }

    /// Look up a field by declared name.
    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields().iter().find(|f| f.name == name)
    }
}

/// Output of one graph build: entries in discovery order, root first.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    entries: Vec<RegistryEntry>,
    index: HashMap<TypeKey, usize>,
    /// Usage keys that map onto a differently-keyed entry.
    aliases: HashMap<TypeKey, TypeKey>,
    diagnostics: Vec<Diagnostic>,
    policy: GenericPolicy,
}

impl ConversionResult {
    /// The root entry.
    pub fn root(&self) -> &RegistryEntry {
        &self.entries[0]
    }

    /// Emission name of the root.
    pub fn root_name(&self) -> &str {
        &self.root().name
    }

    /// All entries, root first, then dependencies in discovery order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Entry for a key as used in a shape.
    pub fn entry(&self, key: &TypeKey) -> Option<&RegistryEntry> {
        let key = self.aliases.get(key).unwrap_or(key);
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Entry with the given emission name.
    pub fn entry_named(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Emission name for a key as used in a shape.
    pub fn name_of(&self, key: &TypeKey) -> Option<&str> {
        self.entry(key).map(|e| e.name.as_str())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn generic_policy(&self) -> GenericPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`ConversionResult`] from a root descriptor.
///
/// Each builder call owns its registry and work queue, so one builder can
/// serve any number of sequential or concurrent builds.
pub struct GraphBuilder<P> {
    provider: P,
    resolver: ResolverConfig,
    config: BuilderConfig,
    cancel: Option<CancelFlag>,
}

impl<P: TypeProvider> GraphBuilder<P> {
    /// Create a builder with default policies.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            resolver: ResolverConfig::default(),
            config: BuilderConfig::default(),
            cancel: None,
        }
    }

    /// Take resolver and builder policies from a full configuration.
    pub fn with_config(mut self, config: &ConvertConfig) -> Self {
        self.resolver = config.resolver.clone();
        self.config = config.builder.clone();
        self
    }

    pub fn with_resolver_config(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_builder_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Check this flag before expanding each queued type.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the graph for a root looked up through the provider.
    pub fn build_named(&self, qualified_name: &str) -> Result<ConversionResult> {
        let root = self
            .provider
            .lookup(qualified_name)
            .ok_or_else(|| ConvertError::RootNotFound(qualified_name.to_string()))?;
        self.build(&root)
    }

    /// Build the graph reachable from `root`.
    pub fn build(&self, root: &TypeDescriptor) -> Result<ConversionResult> {
        let provider = RootAware {
            root: Arc::new(root.clone().normalized()),
            inner: &self.provider,
        };
        let mut expansion = Expansion {
            resolver: TypeResolver::new(&provider, &self.resolver),
            provider: &provider,
            config: &self.config,
            registry: IndexMap::new(),
            queue: VecDeque::new(),
            seen: HashSet::new(),
            aliases: HashMap::new(),
            diagnostics: Vec::new(),
        };

        let root_key = TypeKey::with_args(
            &root.qualified_name,
            root.type_params
                .iter()
                .map(|p| ShapeRef::GenericParam(p.clone()))
                .collect(),
        );
        expansion.discover(&root_key);

        while let Some(key) = expansion.queue.pop_front() {
            if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                info!(
                    root = %root.qualified_name,
                    expanded = expansion.registry.len(),
                    "Conversion cancelled"
                );
                return Err(ConvertError::Cancelled {
                    expanded: expansion.registry.len(),
                });
            }
            if expansion.registry.contains_key(&key) {
                continue;
            }
            let Some(desc) = provider.lookup(&key.name) else {
                continue;
            };

            let entry = expansion.expand(&key, &desc);
            debug!(
                type_key = %key,
                kind = if entry.is_enum() { "enum" } else { "interface" },
                fields = entry.fields().len(),
                "Registered type"
            );
            expansion.registry.insert(key, entry);
        }

        let result = expansion.finish(self.config.generic_policy);
        info!(
            root = %root.qualified_name,
            entries = result.len(),
            diagnostics = result.diagnostics().len(),
            "Conversion graph built"
        );
        Ok(result)
    }
}

/// Provider view that also answers for the root, which a host may pass in
/// without registering it.
struct RootAware<'a, P> {
    root: Arc<TypeDescriptor>,
    inner: &'a P,
}

impl<P: TypeProvider> TypeProvider for RootAware<'_, P> {
    fn lookup(&self, qualified_name: &str) -> Option<Arc<TypeDescriptor>> {
        if qualified_name == self.root.qualified_name {
            Some(self.root.clone())
        } else {
            self.inner.lookup(qualified_name)
        }
    }
}

/// Mutable state of a single build.
struct Expansion<'a, P> {
    resolver: TypeResolver<'a, P>,
    provider: &'a P,
    config: &'a BuilderConfig,
    registry: IndexMap<TypeKey, RegistryEntry>,
    queue: VecDeque<TypeKey>,
    /// Keys ever queued; a key is expanded at most once.
    seen: HashSet<TypeKey>,
    aliases: HashMap<TypeKey, TypeKey>,
    diagnostics: Vec<Diagnostic>,
}

impl<P: TypeProvider> Expansion<'_, P> {
    /// Queue the entry a usage key maps to, unless already known.
    fn discover(&mut self, usage: &TypeKey) {
        let target = match self.config.generic_policy {
            GenericPolicy::Specialize => usage.clone(),
            GenericPolicy::GenericInterface => self.declaration_key(usage),
        };
        if target != *usage {
            self.aliases.insert(usage.clone(), target.clone());
        }
        if self.seen.insert(target.clone()) {
            trace!(type_key = %target, "Queued type");
            self.queue.push_back(target);
        }
    }

    /// Key of the generic declaration behind an instantiation.
    fn declaration_key(&self, usage: &TypeKey) -> TypeKey {
        if usage.args.is_empty() {
            return usage.clone();
        }
        match self.provider.lookup(&usage.name) {
            Some(desc) => TypeKey::with_args(
                &usage.name,
                desc.type_params
                    .iter()
                    .map(|p| ShapeRef::GenericParam(p.clone()))
                    .collect(),
            ),
            None => usage.clone(),
        }
    }

    fn expand(&mut self, key: &TypeKey, desc: &Arc<TypeDescriptor>) -> RegistryEntry {
        let mut type_params = Vec::new();
        for arg in &key.args {
            arg.collect_params(&mut type_params);
        }

        let kind = if desc.is_enum() {
            EntryKind::Enum {
                constants: desc.enum_constants.clone(),
            }
        } else {
            EntryKind::Interface {
                fields: self.collect_fields(desc, &key.args),
            }
        };

        RegistryEntry {
            key: key.clone(),
            name: String::new(),
            simple_name: desc.simple_name.clone(),
            kind,
            type_params,
            doc: desc.doc.clone(),
        }
    }

    /// Flatten the supertype chain into one field list. Fields keep the
    /// position of their first declaration, base-most first; a redeclared
    /// field takes the most derived declaration's type.
    fn collect_fields(&mut self, desc: &Arc<TypeDescriptor>, args: &[ShapeRef]) -> Vec<FieldEntry> {
        let chain = self.supertype_chain(desc, args);

        let mut order: Vec<&str> = Vec::new();
        let mut ordered: HashSet<&str> = HashSet::new();
        for (owner, _) in chain.iter().rev() {
            for field in owner.fields.iter().filter(|f| self.is_emitted(f)) {
                if ordered.insert(field.name.as_str()) {
                    order.push(field.name.as_str());
                }
            }
        }

        let mut winners: HashMap<&str, (usize, &FieldDescriptor)> = HashMap::new();
        for (i, (owner, _)) in chain.iter().enumerate() {
            for field in owner.fields.iter().filter(|f| self.is_emitted(f)) {
                winners.entry(field.name.as_str()).or_insert((i, field));
            }
        }

        let mut fields = Vec::with_capacity(order.len());
        for name in order {
            let (i, field) = winners[name];
            let (owner, bindings) = &chain[i];
            fields.push(self.resolve_field(owner, field, bindings));
        }
        fields
    }

    /// The type itself followed by its user-defined supertypes, each with the
    /// bindings its own generic parameters receive.
    fn supertype_chain(
        &mut self,
        desc: &Arc<TypeDescriptor>,
        args: &[ShapeRef],
    ) -> Vec<(Arc<TypeDescriptor>, Bindings)> {
        let mut chain = vec![(desc.clone(), bind(&desc.type_params, args))];
        if self.config.ignore_parent_fields {
            return chain;
        }

        let mut visited = HashSet::from([desc.qualified_name.clone()]);
        loop {
            let (current, bindings) = &chain[chain.len() - 1];
            let Some(supertype) = current.supertype.clone() else {
                break;
            };
            let owner = current.qualified_name.clone();

            let TypeExpr::Named { name, args: super_args } = &supertype else {
                self.report(
                    Issue::unsupported(format!("supertype {} is not a named type", supertype)),
                    &owner,
                    None,
                );
                break;
            };
            // Platform supertypes contribute no fields.
            if builtins::classify(name).is_some() {
                break;
            }
            if !visited.insert(name.clone()) {
                self.report(
                    Issue::unsupported(format!("cyclic supertype chain through {}", name)),
                    &owner,
                    None,
                );
                break;
            }
            let Some(next) = self.provider.lookup(name) else {
                self.report(Issue::unresolved(format!("supertype {}", name)), &owner, None);
                break;
            };

            let mut issues = Vec::new();
            let mut next_args: Vec<ShapeRef> = super_args
                .iter()
                .map(|a| self.resolver.resolve(a, bindings, &mut issues))
                .collect();
            next_args.resize(next.type_params.len(), ShapeRef::Unknown);
            let next_bindings = bind(&next.type_params, &next_args);

            for issue in issues {
                self.report(issue, &owner, None);
            }
            chain.push((next, next_bindings));
        }
        chain
    }

    fn is_emitted(&self, field: &FieldDescriptor) -> bool {
        !field.is_static && !(field.is_transient && self.config.skip_transient)
    }

    fn resolve_field(
        &mut self,
        owner: &TypeDescriptor,
        field: &FieldDescriptor,
        bindings: &Bindings,
    ) -> FieldEntry {
        let mut issues = Vec::new();
        let resolved = self.resolver.resolve_field(&field.ty, bindings, &mut issues);
        for issue in issues {
            self.report(issue, &owner.qualified_name, Some(&field.name));
        }

        let mut found = Vec::new();
        resolved.shape.for_each_key(&mut |k: &TypeKey| found.push(k.clone()));
        for key in &found {
            self.discover(key);
        }

        trace!(
            owner = %owner.qualified_name,
            field = %field.name,
            shape = %resolved.shape,
            "Resolved field"
        );

        FieldEntry {
            name: field.name.clone(),
            json_name: field.json_name.clone(),
            shape: resolved.shape,
            nullable: field.nullable || resolved.nullable,
            required: field.required,
            doc: field.doc.clone(),
        }
    }

    fn report(&mut self, issue: Issue, owner: &str, field: Option<&str>) {
        let diagnostic = Diagnostic::from_issue(issue, owner, field);
        warn!(%diagnostic, "Conversion diagnostic");
        self.diagnostics.push(diagnostic);
    }

    fn finish(self, policy: GenericPolicy) -> ConversionResult {
        let mut names = {
            let requests: Vec<NameRequest<'_>> = self
                .registry
                .values()
                .map(|e| NameRequest {
                    key: &e.key,
                    simple_name: &e.simple_name,
                })
                .collect();
            NameAllocator::new().assign(&requests)
        };

        let mut entries = Vec::with_capacity(self.registry.len());
        let mut index = HashMap::with_capacity(self.registry.len());
        for (i, (key, mut entry)) in self.registry.into_iter().enumerate() {
            if let Some(name) = names.swap_remove(&key) {
                entry.name = name;
            }
            index.insert(key, i);
            entries.push(entry);
        }

        ConversionResult {
            entries,
            index,
            aliases: self.aliases,
            diagnostics: self.diagnostics,
            policy,
        }
    }
}
