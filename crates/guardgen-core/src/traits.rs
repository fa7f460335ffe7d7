//! Traits for the declaration index consumed by the translator.

use crate::ir::{DeclKind, Declaration, Member, TypeExpr, TypeParam};
use std::collections::HashMap;
use std::path::Path;

/// Read-only view of the declarations known to a generation run.
///
/// The translator and builder only ever ask the index questions; they never
/// mutate it, so one index can serve any number of declarations.
///
/// # Implementing Custom Indexes
///
/// ```ignore
/// use guardgen_core::{DeclarationIndex, ir::Declaration};
///
/// struct Fixed(Vec<Declaration>);
///
/// impl DeclarationIndex for Fixed {
///     fn declarations(&self) -> &[Declaration] { &self.0 }
///     fn lookup(&self, name: &str) -> Option<&Declaration> {
///         self.0.iter().find(|d| d.name == name)
///     }
/// }
/// ```
pub trait DeclarationIndex {
    /// All declarations in source encounter order.
    fn declarations(&self) -> &[Declaration];

    /// First declaration with the given name.
    fn lookup(&self, name: &str) -> Option<&Declaration>;

    /// File the named declaration came from, if known.
    fn source_path(&self, _name: &str) -> Option<&Path> {
        None
    }

    fn is_enum_name(&self, name: &str) -> bool {
        matches!(
            self.lookup(name).map(|d| &d.kind),
            Some(DeclKind::Enum(_))
        )
    }

    /// Whether a guard named `is<Name>` exists for this name.
    fn is_interface_name(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(Declaration::has_guard)
    }

    /// Members of an interface including those inherited through `extends`,
    /// or the members of an alias to an inline object type.
    fn resolve_members(&self, decl: &Declaration) -> Vec<Member> {
        let mut visiting = vec![decl.name.clone()];
        collect_members(self, decl, &mut visiting)
    }

    fn resolve_type_parameters<'a>(&self, decl: &'a Declaration) -> &'a [TypeParam] {
        decl.type_params()
    }
}

fn collect_members<I: DeclarationIndex + ?Sized>(
    index: &I,
    decl: &Declaration,
    visiting: &mut Vec<String>,
) -> Vec<Member> {
    let iface = match &decl.kind {
        DeclKind::Interface(iface) => iface,
        DeclKind::Alias(alias) => {
            return match alias.definition.unparen() {
                TypeExpr::Object(shape) => shape.members.clone(),
                _ => Vec::new(),
            };
        }
        DeclKind::Enum(_) => return Vec::new(),
    };

    let mut merged: Vec<Member> = Vec::new();
    for parent in &iface.extends {
        let TypeExpr::Reference { name, args } = parent else {
            continue;
        };
        if visiting.contains(name) {
            continue;
        }
        let Some(parent_decl) = index.lookup(name) else {
            continue;
        };

        visiting.push(name.clone());
        let inherited = collect_members(index, parent_decl, visiting);
        visiting.pop();

        let bindings = bind_type_args(parent_decl.type_params(), args);
        for member in inherited {
            upsert(&mut merged, member.substitute(&bindings));
        }
    }
    for member in &iface.members {
        upsert(&mut merged, member.clone());
    }
    merged
}

/// Pair each parameter with its argument, falling back to the default.
pub(crate) fn bind_type_args(params: &[TypeParam], args: &[TypeExpr]) -> HashMap<String, TypeExpr> {
    params
        .iter()
        .enumerate()
        .filter_map(|(i, param)| {
            args.get(i)
                .or(param.default.as_ref())
                .map(|ty| (param.name.clone(), ty.clone()))
        })
        .collect()
}

fn upsert(members: &mut Vec<Member>, member: Member) {
    match members.iter_mut().find(|m| m.name == member.name) {
        Some(existing) => *existing = member,
        None => members.push(member),
    }
}
