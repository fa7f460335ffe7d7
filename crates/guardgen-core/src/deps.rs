//! Dependency collection over finished guard definitions.
//!
//! Walks the guard tree and the type annotations it will be rendered with,
//! so only identifiers that actually appear in the emitted code are reported.

use crate::guard::{GuardDef, GuardExpr, GuardForm, Helper};
use crate::ir::{TypeExpr, TypeParam};
use crate::traits::DeclarationIndex;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Type names that never need an import.
const BUILTIN_TYPES: &[&str] = &[
    "string", "number", "boolean", "any", "unknown", "null", "undefined", "Date", "Array",
    "array", "Promise", "Map", "Set", "RegExp", "Error", "Object", "Function", "Symbol",
    "BigInt", "Partial", "Record",
];

/// Refinement type aliases exported by the runtime library.
pub const RUNTIME_TYPE_ALIASES: &[&str] = &[
    "NonEmptyArray",
    "NonEmptyString",
    "NonNegativeNumber",
    "PositiveNumber",
    "Nullable",
];

/// Another generated guard invoked by a definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GuardDependency {
    pub guard: String,
    /// Declaration the guard belongs to; locates its file.
    pub type_name: String,
}

/// Everything a rendered guard needs imported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependencies {
    /// Generated guards called from the body, sorted, excluding the guard itself.
    pub guards: Vec<GuardDependency>,
    /// Declared types named in type positions (type-only imports).
    pub types: Vec<String>,
    /// Enums used at runtime or in type positions.
    pub enums: Vec<String>,
    /// Runtime library type aliases named in type positions.
    pub runtime_types: Vec<String>,
    /// Runtime helpers called, sorted by name.
    pub helpers: Vec<Helper>,
    pub needs_type_guard_fn: bool,
}

/// Collect the dependencies of `def`.
pub fn collect(def: &GuardDef, index: &dyn DeclarationIndex) -> Dependencies {
    let mut collector = Collector {
        index,
        params: &def.type_params,
        guards: BTreeSet::new(),
        types: BTreeSet::new(),
        enums: BTreeSet::new(),
        runtime_types: BTreeSet::new(),
        helpers: BTreeSet::new(),
    };

    // The signature of a function or generic constructor names the type.
    if def.form == GuardForm::SelfReferencing || def.is_generic() {
        collector.type_names(&def.self_type());
    }
    for param in &def.type_params {
        if let Some(constraint) = &param.constraint {
            collector.type_names(constraint);
        }
        if let Some(default) = &param.default {
            collector.type_names(default);
        }
    }
    collector.guard(&def.body);

    let mut helpers: Vec<Helper> = collector.helpers.into_iter().collect();
    helpers.sort_by_key(|h| h.name());

    let deps = Dependencies {
        guards: collector
            .guards
            .into_iter()
            .filter(|dep| dep.guard != def.guard_name && dep.type_name != def.type_name)
            .collect(),
        types: collector.types.into_iter().collect(),
        enums: collector.enums.into_iter().collect(),
        runtime_types: collector.runtime_types.into_iter().collect(),
        helpers,
        needs_type_guard_fn: def.is_generic(),
    };
    debug!(
        guard = %def.guard_name,
        guards = deps.guards.len(),
        types = ?deps.types,
        enums = ?deps.enums,
        "collected dependencies"
    );
    deps
}

struct Collector<'a> {
    index: &'a dyn DeclarationIndex,
    params: &'a [TypeParam],
    guards: BTreeSet<GuardDependency>,
    types: BTreeSet<String>,
    enums: BTreeSet<String>,
    runtime_types: BTreeSet<String>,
    helpers: BTreeSet<Helper>,
}

impl Collector<'_> {
    fn guard(&mut self, expr: &GuardExpr) {
        match expr {
            GuardExpr::Helper(helper) => {
                self.helpers.insert(*helper);
            }
            GuardExpr::Apply { helper, args } => {
                self.helpers.insert(*helper);
                for arg in args {
                    self.guard(arg);
                }
            }
            GuardExpr::OneOfTypes(branches) => {
                self.helpers.insert(Helper::IsOneOfTypes);
                for branch in branches {
                    self.type_names(&branch.ty);
                    self.guard(&branch.guard);
                }
            }
            GuardExpr::EqualTo(_) => {
                self.helpers.insert(Helper::IsEqualTo);
            }
            GuardExpr::OneOf(_) => {
                self.helpers.insert(Helper::IsOneOf);
            }
            GuardExpr::Enum(name) => {
                self.helpers.insert(Helper::IsEnum);
                self.enums.insert(name.clone());
            }
            GuardExpr::EnumMember { enum_name, .. } => {
                self.helpers.insert(Helper::IsEqualTo);
                self.enums.insert(enum_name.clone());
            }
            GuardExpr::Named {
                guard,
                type_name,
                args,
            } => {
                self.guards.insert(GuardDependency {
                    guard: guard.clone(),
                    type_name: type_name.clone(),
                });
                for arg in args {
                    self.guard(arg);
                }
            }
            GuardExpr::Param(_) => {}
            GuardExpr::Object(object) => {
                if !object.bare {
                    self.helpers.insert(Helper::IsType);
                }
                if let Some(annotation) = &object.annotation {
                    self.type_names(annotation);
                }
                for member in &object.members {
                    if member.optional {
                        self.helpers.insert(Helper::IsUndefinedOr);
                    }
                    self.guard(&member.guard);
                }
            }
            GuardExpr::Placeholder(name) => {
                self.helpers.insert(Helper::IsType);
                self.type_name(name);
            }
        }
    }

    /// Record every identifier in a type that will be written out.
    fn type_names(&mut self, ty: &TypeExpr) {
        match ty {
            TypeExpr::Reference { name, args } => {
                self.type_name(name);
                for arg in args {
                    self.type_names(arg);
                }
            }
            TypeExpr::Union(members) => {
                for member in members {
                    self.type_names(member);
                }
            }
            TypeExpr::Array(inner) | TypeExpr::Paren(inner) => self.type_names(inner),
            TypeExpr::Object(shape) => {
                for member in &shape.members {
                    self.type_names(&member.ty);
                }
                if let Some(value) = &shape.index {
                    self.type_names(value);
                }
            }
            TypeExpr::Primitive(_) | TypeExpr::Literal(_) | TypeExpr::Unsupported(_) => {}
        }
    }

    fn type_name(&mut self, name: &str) {
        if self.params.iter().any(|p| p.name == name) || BUILTIN_TYPES.contains(&name) {
            return;
        }
        if RUNTIME_TYPE_ALIASES.contains(&name) {
            self.runtime_types.insert(name.to_string());
            return;
        }
        // `Enum.Member` needs the enum itself.
        let head = name.split_once('.').map_or(name, |(head, _)| head);
        if self.index.is_enum_name(head) {
            self.enums.insert(head.to_string());
        } else if self.index.lookup(name).is_some() {
            self.types.insert(name.to_string());
        }
    }
}
