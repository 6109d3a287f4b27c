//! Maps declared type expressions onto structural shapes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use dtoshape_core::{
    PrimitiveKind, ResolverConfig, ShapeRef, TypeDescriptor, TypeExpr, TypeKey, TypeKind,
    TypeProvider, WildcardKind,
};

use crate::builtins::{self, Builtin};
use crate::diagnostics::Issue;

/// Generic parameter name to the shape it is bound to.
pub type Bindings = HashMap<String, ShapeRef>;

/// Bind declared parameters positionally. Missing arguments bind to `Unknown`.
pub fn bind(params: &[String], args: &[ShapeRef]) -> Bindings {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| (p.clone(), args.get(i).cloned().unwrap_or(ShapeRef::Unknown)))
        .collect()
}

/// Field-level resolution: the shape plus nullability implied by the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub shape: ShapeRef,
    /// The declared type itself admits absence (`Optional<T>`).
    pub nullable: bool,
}

/// Resolves type expressions against a provider.
pub struct TypeResolver<'a, P: ?Sized> {
    provider: &'a P,
    config: &'a ResolverConfig,
    /// Types whose supertype chain is being followed to a platform shape.
    structural: RefCell<Vec<String>>,
}

impl<'a, P: TypeProvider + ?Sized> TypeResolver<'a, P> {
    pub fn new(provider: &'a P, config: &'a ResolverConfig) -> Self {
        Self {
            provider,
            config,
            structural: RefCell::new(Vec::new()),
        }
    }

    /// Resolve a type usage to a shape. Problems are appended to `issues`
    /// and the affected position falls back to `Unknown`.
    pub fn resolve(&self, expr: &TypeExpr, bindings: &Bindings, issues: &mut Vec<Issue>) -> ShapeRef {
        self.resolve_at(expr, bindings, issues, 0)
    }

    /// Resolve a field's declared type, unwrapping a top-level `Optional`.
    pub fn resolve_field(
        &self,
        expr: &TypeExpr,
        bindings: &Bindings,
        issues: &mut Vec<Issue>,
    ) -> Resolved {
        if let TypeExpr::Named { name, args } = expr {
            if !bindings.contains_key(name) {
                match builtins::classify(name) {
                    Some(Builtin::Optional) => {
                        return Resolved {
                            shape: self.arg(args, 0, bindings, issues, 0),
                            nullable: true,
                        };
                    }
                    Some(Builtin::OptionalNumber) => {
                        return Resolved {
                            shape: ShapeRef::Primitive(PrimitiveKind::Number),
                            nullable: true,
                        };
                    }
                    _ => {}
                }
            }
        }

        Resolved {
            shape: self.resolve(expr, bindings, issues),
            nullable: false,
        }
    }

    fn resolve_at(
        &self,
        expr: &TypeExpr,
        bindings: &Bindings,
        issues: &mut Vec<Issue>,
        depth: usize,
    ) -> ShapeRef {
        if depth > self.config.max_depth {
            issues.push(Issue::unsupported(format!(
                "type nested deeper than {} levels",
                self.config.max_depth
            )));
            return ShapeRef::Unknown;
        }

        match expr {
            TypeExpr::Unresolved(text) => {
                issues.push(Issue::unresolved(text.clone()));
                ShapeRef::Unknown
            }
            TypeExpr::Array(element) => {
                ShapeRef::array(self.resolve_at(element, bindings, issues, depth + 1))
            }
            TypeExpr::Wildcard { bound: None, .. } => ShapeRef::Unknown,
            TypeExpr::Wildcard {
                kind: WildcardKind::Extends,
                bound: Some(bound),
            } => self.resolve_at(bound, bindings, issues, depth + 1),
            // `? super X` erases to the universal supertype.
            TypeExpr::Wildcard {
                kind: WildcardKind::Super,
                ..
            } => ShapeRef::Unknown,
            TypeExpr::Named { name, args } => {
                self.resolve_named(name, args, bindings, issues, depth)
            }
        }
    }

    fn resolve_named(
        &self,
        name: &str,
        args: &[TypeExpr],
        bindings: &Bindings,
        issues: &mut Vec<Issue>,
        depth: usize,
    ) -> ShapeRef {
        if let Some(bound) = bindings.get(name) {
            if !args.is_empty() {
                issues.push(Issue::unsupported(format!(
                    "type parameter {} used with type arguments",
                    name
                )));
            }
            return bound.clone();
        }

        if let Some(builtin) = builtins::classify(name) {
            return self.resolve_builtin(builtin, args, bindings, issues, depth);
        }

        match self.provider.lookup(name) {
            Some(desc) => self.resolve_declared(&desc, args, bindings, issues, depth),
            None => {
                issues.push(Issue::unresolved(name));
                ShapeRef::Unknown
            }
        }
    }

    fn resolve_builtin(
        &self,
        builtin: Builtin,
        args: &[TypeExpr],
        bindings: &Bindings,
        issues: &mut Vec<Issue>,
        depth: usize,
    ) -> ShapeRef {
        match builtin {
            Builtin::Number | Builtin::OptionalNumber => ShapeRef::Primitive(PrimitiveKind::Number),
            Builtin::Boolean => ShapeRef::Primitive(PrimitiveKind::Boolean),
            Builtin::Text => ShapeRef::StringLike,
            Builtin::Date if self.config.dates_as_strings => ShapeRef::StringLike,
            Builtin::Date => ShapeRef::Primitive(PrimitiveKind::Date),
            Builtin::Uuid if self.config.uuid_as_string => ShapeRef::StringLike,
            Builtin::Uuid | Builtin::Object => ShapeRef::Unknown,
            Builtin::Collection => {
                ShapeRef::array(self.arg(args, 0, bindings, issues, depth))
            }
            Builtin::Map => ShapeRef::map(
                self.arg(args, 0, bindings, issues, depth),
                self.arg(args, 1, bindings, issues, depth),
            ),
            // Nested optionals keep their value shape only.
            Builtin::Optional => self.arg(args, 0, bindings, issues, depth),
        }
    }

    fn resolve_declared(
        &self,
        desc: &Arc<TypeDescriptor>,
        args: &[TypeExpr],
        bindings: &Bindings,
        issues: &mut Vec<Issue>,
        depth: usize,
    ) -> ShapeRef {
        if desc.is_enum() {
            return ShapeRef::EnumRef(TypeKey::plain(&desc.qualified_name));
        }

        let resolved: Vec<ShapeRef> = args
            .iter()
            .map(|a| self.resolve_at(a, bindings, issues, depth + 1))
            .collect();
        let key_args = self.fit_arity(desc, resolved, issues);

        if let Some(shape) = self.structural_shape(desc, &key_args, issues, depth) {
            return shape;
        }

        match desc.kind {
            TypeKind::Collection => {
                ShapeRef::array(key_args.first().cloned().unwrap_or(ShapeRef::Unknown))
            }
            TypeKind::Map => ShapeRef::map(
                key_args.first().cloned().unwrap_or(ShapeRef::Unknown),
                key_args.get(1).cloned().unwrap_or(ShapeRef::Unknown),
            ),
            TypeKind::PrimitiveWrapper => {
                issues.push(Issue::unsupported(format!(
                    "primitive wrapper {} is not a known platform type",
                    desc.qualified_name
                )));
                ShapeRef::Unknown
            }
            TypeKind::Class | TypeKind::Interface | TypeKind::Enum => {
                let key_args = self.cap_arg_depth(desc, key_args, issues);
                ShapeRef::Reference(TypeKey::with_args(&desc.qualified_name, key_args))
            }
        }
    }

    /// Pad raw or partial argument lists with `Unknown`, drop extras.
    fn fit_arity(
        &self,
        desc: &TypeDescriptor,
        mut args: Vec<ShapeRef>,
        issues: &mut Vec<Issue>,
    ) -> Vec<ShapeRef> {
        let expected = desc.type_params.len();
        if args.len() > expected {
            issues.push(Issue::unsupported(format!(
                "{} takes {} type argument(s), got {}",
                desc.qualified_name,
                expected,
                args.len()
            )));
            args.truncate(expected);
        } else if !args.is_empty() && args.len() < expected {
            issues.push(Issue::unsupported(format!(
                "{} takes {} type argument(s), got {}",
                desc.qualified_name,
                expected,
                args.len()
            )));
        }
        args.resize(expected, ShapeRef::Unknown);
        args
    }

    /// Replace key arguments nested deeper than `max_arg_depth` with
    /// `Unknown`. A generic type that refers to itself with a growing
    /// argument (`Nest<T>` holding `Nest<List<T>>`) then yields finitely
    /// many keys.
    fn cap_arg_depth(
        &self,
        desc: &TypeDescriptor,
        args: Vec<ShapeRef>,
        issues: &mut Vec<Issue>,
    ) -> Vec<ShapeRef> {
        let limit = self.config.max_arg_depth;
        args.into_iter()
            .map(|arg| {
                if arg.depth() > limit {
                    issues.push(Issue::unsupported(format!(
                        "type argument of {} nested deeper than {} levels",
                        desc.qualified_name, limit
                    )));
                    ShapeRef::Unknown
                } else {
                    arg
                }
            })
            .collect()
    }

    /// Follow the supertype chain up to a platform collection, map or scalar,
    /// e.g. `class ItemList extends ArrayList<Item>` resolves to `Item[]`.
    ///
    /// A type that structurally contains itself (`class Tree extends
    /// ArrayList<Tree>`) resolves to `Unknown` at the inner occurrence.
    fn structural_shape(
        &self,
        desc: &Arc<TypeDescriptor>,
        args: &[ShapeRef],
        issues: &mut Vec<Issue>,
        depth: usize,
    ) -> Option<ShapeRef> {
        if !self.reaches_platform_type(desc) {
            return None;
        }

        let name = &desc.qualified_name;
        if self.structural.borrow().contains(name) {
            issues.push(Issue::unsupported(format!(
                "{} structurally contains itself",
                name
            )));
            return Some(ShapeRef::Unknown);
        }

        self.structural.borrow_mut().push(name.clone());
        let shape = self.follow_supertypes(desc, args, issues, depth);
        self.structural.borrow_mut().pop();
        shape
    }

    /// Whether the supertype chain ends at a platform type other than `Object`.
    fn reaches_platform_type(&self, desc: &Arc<TypeDescriptor>) -> bool {
        let mut current = desc.clone();
        for _ in 0..=self.config.max_depth {
            let Some(TypeExpr::Named { name, .. }) = &current.supertype else {
                return false;
            };
            if let Some(builtin) = builtins::classify(name) {
                return builtin != Builtin::Object;
            }
            match self.provider.lookup(name) {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }

    fn follow_supertypes(
        &self,
        desc: &Arc<TypeDescriptor>,
        args: &[ShapeRef],
        issues: &mut Vec<Issue>,
        depth: usize,
    ) -> Option<ShapeRef> {
        let mut current = desc.clone();
        let mut bindings = bind(&current.type_params, args);
        let mut level = depth;

        while let Some(supertype) = current.supertype.clone() {
            level += 1;
            if level > self.config.max_depth {
                return None;
            }

            let TypeExpr::Named { name, args: super_args } = &supertype else {
                return None;
            };

            if let Some(builtin) = builtins::classify(name) {
                return match builtin {
                    Builtin::Object => None,
                    _ => Some(self.resolve_at(&supertype, &bindings, issues, level)),
                };
            }

            let next = self.provider.lookup(name)?;
            let next_args: Vec<ShapeRef> = super_args
                .iter()
                .map(|a| self.resolve_at(a, &bindings, issues, level + 1))
                .collect();
            bindings = bind(&next.type_params, &next_args);
            current = next;
        }

        None
    }

    fn arg(
        &self,
        args: &[TypeExpr],
        index: usize,
        bindings: &Bindings,
        issues: &mut Vec<Issue>,
        depth: usize,
    ) -> ShapeRef {
        args.get(index)
            .map(|a| self.resolve_at(a, bindings, issues, depth + 1))
            .unwrap_or(ShapeRef::Unknown)
    }
}
